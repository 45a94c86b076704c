//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all employee routes
//! - Wire up middleware (tracing, request id, timeout, body limit, metrics)
//! - Bind server to listener and shut down gracefully

use std::time::Duration;

use axum::{
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::FacadeConfig;
use crate::employees::EmployeeService;
use crate::lifecycle::ShutdownSignal;
use crate::http::handlers;
use crate::http::request::{make_span, track_metrics, UuidRequestId};
use crate::upstream::{UpstreamClient, UpstreamResult, UpstreamSettings};

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub employees: EmployeeService,
}

/// HTTP server for the employee facade.
pub struct HttpServer {
    router: Router,
    config: FacadeConfig,
}

impl HttpServer {
    /// Create a server around an already built employee service.
    pub fn new(config: FacadeConfig, employees: EmployeeService) -> Self {
        let state = AppState { employees };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the upstream client from the config, then the server.
    pub fn from_config(config: FacadeConfig) -> UpstreamResult<Self> {
        let settings = UpstreamSettings::from_config(&config.upstream, &config.retries)?;
        let client = UpstreamClient::new(settings)?;
        Ok(Self::new(config, EmployeeService::new(client)))
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &FacadeConfig, state: AppState) -> Router {
        Router::new()
            .route(
                "/employees",
                get(handlers::list_employees).post(handlers::create_employee),
            )
            .route("/employees/search/{fragment}", get(handlers::search_employees))
            .route("/employees/highestSalary", get(handlers::highest_salary))
            .route(
                "/employees/topTenHighestEarningEmployeeNames",
                get(handlers::top_earning_names),
            )
            .route(
                "/employees/{id}",
                get(handlers::get_employee).delete(handlers::delete_employee),
            )
            .route("/health", get(handlers::health))
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The configured router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
