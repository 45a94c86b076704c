//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    http::{header, Method, StatusCode, Uri},
    Router,
};
use employee_facade::config::FacadeConfig;
use employee_facade::lifecycle::Shutdown;
use employee_facade::HttpServer;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: String,
}

impl RecordedRequest {
    #[allow(dead_code)]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

/// A programmable upstream running on an ephemeral port.
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    /// Base URL the facade should be configured with.
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn count(&self, method: Method) -> usize {
        self.requests().iter().filter(|r| r.method == method).count()
    }
}

/// Start a mock upstream whose responses come from `respond`.
///
/// `respond` gets every request after it has been recorded and returns the
/// status code and body to send back.
pub async fn start_mock_upstream<F>(respond: F) -> MockUpstream
where
    F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let recorded = requests.clone();
    let app = Router::new().fallback(move |method: Method, uri: Uri, body: String| {
        let recorded = recorded.clone();
        let respond = respond.clone();
        async move {
            let request = RecordedRequest {
                method,
                path: uri.path().to_string(),
                body,
            };
            recorded.lock().unwrap().push(request.clone());
            let (status, body) = respond(&request);
            (
                StatusCode::from_u16(status).unwrap(),
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
        }
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, requests }
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Upstream employee JSON in wire format.
#[allow(dead_code)]
pub fn employee_json(id: &str, name: &str, salary: u32) -> Value {
    json!({
        "id": id,
        "employee_name": name,
        "employee_salary": salary,
        "employee_age": 30,
        "employee_title": "Engineer",
        "employee_email": format!("{}@company.com", name.to_lowercase()),
    })
}

/// `{"data": ...}` envelope as a response body.
#[allow(dead_code)]
pub fn envelope(data: Value) -> String {
    json!({ "data": data, "status": "Successfully processed request." }).to_string()
}

/// Facade config pointed at `base_url`, with short backoff delays.
#[allow(dead_code)]
pub fn facade_config(base_url: &str) -> FacadeConfig {
    let mut config = FacadeConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = base_url.to_string();
    config.upstream.request_timeout_secs = 5;
    config.upstream.use_system_proxy = false;
    config.retries.base_delay_ms = 20;
    config.retries.max_delay_ms = 1000;
    config
}

/// HTTP client for talking to local test servers.
#[allow(dead_code)]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Start the facade on an ephemeral port.
#[allow(dead_code)]
pub async fn start_facade(config: FacadeConfig) -> (SocketAddr, Shutdown) {
    let server = HttpServer::from_config(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    (addr, shutdown)
}
