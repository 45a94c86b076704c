//! End-to-end tests: facade in front of a mock employee directory.

use axum::http::Method;
use employee_facade::http::ApiErrorResponse;
use employee_facade::Shutdown;
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

use common::{
    employee_json, envelope, facade_config, http_client, start_facade, start_mock_upstream,
    MockUpstream, RecordedRequest,
};

/// A small directory: Chirag (2000), John (1000) and Jane (1500).
fn directory(request: &RecordedRequest) -> (u16, String) {
    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/api/v1/employee") => (
            200,
            envelope(json!([
                employee_json("1", "Chirag", 2000),
                employee_json("2", "John", 1000),
                employee_json("3", "Jane", 1500),
            ])),
        ),
        ("GET", "/api/v1/employee/1") => (200, envelope(employee_json("1", "Chirag", 2000))),
        ("GET", _) => (404, String::new()),
        ("POST", "/api/v1/employee") => {
            let body = request.json();
            (
                200,
                envelope(employee_json(
                    "new-id",
                    body["name"].as_str().unwrap_or_default(),
                    body["salary"].as_u64().unwrap_or_default() as u32,
                )),
            )
        }
        ("DELETE", "/api/v1/employee") => (200, json!({ "data": true }).to_string()),
        _ => (405, String::new()),
    }
}

/// Start a facade in front of `upstream`. The server stops once the
/// returned [`Shutdown`] is dropped.
async fn facade_for(upstream: &MockUpstream) -> (String, Shutdown) {
    let (addr, shutdown) = start_facade(facade_config(&upstream.base_url())).await;
    (format!("http://{}", addr), shutdown)
}

#[tokio::test]
async fn test_list_employees() {
    let upstream = start_mock_upstream(directory).await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .get(format!("{}/employees", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let employees = body.as_array().unwrap();
    assert_eq!(employees.len(), 3);
    assert_eq!(employees[0]["employee_name"], "Chirag");
    assert_eq!(employees[0]["employee_salary"], 2000);
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let upstream = start_mock_upstream(directory).await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .get(format!("{}/employees/search/cHI", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["employee_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Chirag"]);
}

#[tokio::test]
async fn test_highest_salary() {
    let upstream = start_mock_upstream(directory).await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .get(format!("{}/employees/highestSalary", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "2000");
}

#[tokio::test]
async fn test_highest_salary_of_empty_directory_is_zero() {
    let upstream = start_mock_upstream(|_| (200, envelope(json!([])))).await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .get(format!("{}/employees/highestSalary", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "0");
}

#[tokio::test]
async fn test_top_earning_names_in_salary_order() {
    let upstream = start_mock_upstream(directory).await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .get(format!("{}/employees/topTenHighestEarningEmployeeNames", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let names: Vec<String> = res.json().await.unwrap();
    assert_eq!(names, vec!["Chirag", "Jane", "John"]);
}

#[tokio::test]
async fn test_get_employee_by_id() {
    let upstream = start_mock_upstream(directory).await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .get(format!("{}/employees/1", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["id"], "1");
    assert_eq!(body["employee_name"], "Chirag");
}

#[tokio::test]
async fn test_unknown_employee_is_404() {
    let upstream = start_mock_upstream(directory).await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .get(format!("{}/employees/x", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: ApiErrorResponse = res.json().await.unwrap();
    assert_eq!(body.status, 404);
    assert_eq!(body.error, "Not Found");
    assert_eq!(body.message, "Employee with ID 'x' not found");
    assert_eq!(body.path, "/employees/x");
    // a 404 is an answer, not a failure to retry
    assert_eq!(upstream.requests().len(), 1);
}

#[tokio::test]
async fn test_create_rejects_every_invalid_field() {
    let upstream = start_mock_upstream(directory).await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .post(format!("{}/employees", base))
        .json(&json!({ "name": "  ", "salary": 0, "age": 0 }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: ApiErrorResponse = res.json().await.unwrap();
    assert_eq!(body.error, "Validation Error");
    assert_eq!(
        body.message,
        "Validation failed: [name: Name is required] [salary: Salary must be greater than 0] \
         [age: Age must be greater than 0] [title: Title is required]"
    );
    assert_eq!(body.path, "/employees");
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let upstream = start_mock_upstream(directory).await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .post(format!("{}/employees", base))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: ApiErrorResponse = res.json().await.unwrap();
    assert_eq!(body.error, "Validation Error");
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_create_employee() {
    let upstream = start_mock_upstream(directory).await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .post(format!("{}/employees", base))
        .json(&json!({ "name": "Jill", "salary": 4200, "age": 28, "title": "Analyst" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["id"], "new-id");
    assert_eq!(body["employee_name"], "Jill");
    assert_eq!(body["employee_salary"], 4200);
    assert_eq!(upstream.count(Method::POST), 1);
}

#[tokio::test]
async fn test_delete_employee_by_id() {
    let upstream = start_mock_upstream(directory).await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .delete(format!("{}/employees/1", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Deleted employee: Chirag");

    let deletes: Vec<_> = upstream
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::DELETE)
        .collect();
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].json(), json!({ "name": "Chirag" }));
}

#[tokio::test]
async fn test_delete_unknown_employee_never_deletes() {
    let upstream = start_mock_upstream(directory).await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .delete(format!("{}/employees/x", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(upstream.count(Method::DELETE), 0);
}

#[tokio::test]
async fn test_delete_rejected_by_upstream_is_500() {
    let upstream = start_mock_upstream(|request| match request.method.as_str() {
        "GET" => (200, envelope(employee_json("1", "Chirag", 2000))),
        _ => (404, String::new()),
    })
    .await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .delete(format!("{}/employees/1", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ApiErrorResponse = res.json().await.unwrap();
    assert_eq!(body.error, "Internal Server Error");
    assert_eq!(body.message, "Failed to delete employee with ID 1");
}

#[tokio::test]
async fn test_delete_refused_by_upstream_is_500() {
    let upstream = start_mock_upstream(|request| match request.method.as_str() {
        "GET" => (200, envelope(employee_json("1", "Chirag", 2000))),
        _ => (200, json!({ "data": false }).to_string()),
    })
    .await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .delete(format!("{}/employees/1", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ApiErrorResponse = res.json().await.unwrap();
    assert_eq!(body.message, "Failed to delete employee with ID 1");
    assert_eq!(upstream.count(Method::DELETE), 1);
}

#[tokio::test]
async fn test_delete_of_nameless_employee_never_deletes() {
    let upstream = start_mock_upstream(|request| match request.method.as_str() {
        "GET" => {
            let mut employee = employee_json("9", "Ghost", 700);
            employee["employee_name"] = Value::Null;
            (200, envelope(employee))
        }
        _ => (200, String::new()),
    })
    .await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .delete(format!("{}/employees/9", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ApiErrorResponse = res.json().await.unwrap();
    assert_eq!(body.error, "Internal Server Error");
    assert_eq!(body.message, "Failed to delete employee with ID 9");
    assert_eq!(upstream.count(Method::DELETE), 0);
}

#[tokio::test]
async fn test_unavailable_upstream_is_503() {
    let upstream = start_mock_upstream(|_| (503, "down".to_string())).await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .get(format!("{}/employees/highestSalary", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: ApiErrorResponse = res.json().await.unwrap();
    assert_eq!(body.status, 503);
    assert_eq!(body.error, "Service Unavailable");
    assert_eq!(body.path, "/employees/highestSalary");
    // upstream details stay in the logs
    assert!(!body.message.contains("down"));
    assert_eq!(upstream.requests().len(), 3);
}

#[tokio::test]
async fn test_unexpected_upstream_status_is_500() {
    let upstream = start_mock_upstream(|_| (400, "bad".to_string())).await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .get(format!("{}/employees", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(upstream.requests().len(), 1);
}

#[tokio::test]
async fn test_health() {
    let upstream = start_mock_upstream(directory).await;
    let (base, _shutdown) = facade_for(&upstream).await;

    let res = http_client()
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_request_id_is_generated_and_propagated() {
    let upstream = start_mock_upstream(directory).await;
    let (base, _shutdown) = facade_for(&upstream).await;
    let client = http_client();

    let res = client.get(format!("{}/health", base)).send().await.unwrap();
    let generated = res.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(!generated.is_empty());

    let res = client
        .get(format!("{}/health", base))
        .header("x-request-id", "client-chosen-id")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "client-chosen-id");
}

#[tokio::test]
async fn test_shutdown_stops_serving() {
    let upstream = start_mock_upstream(directory).await;
    let (base, shutdown) = facade_for(&upstream).await;
    let client = http_client();

    let res = client.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    shutdown.trigger();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    assert!(client.get(format!("{}/health", base)).send().await.is_err());
}
