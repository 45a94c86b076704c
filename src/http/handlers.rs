//! Employee route handlers.

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, State},
    Json,
};
use serde::Serialize;

use crate::employees::{
    validate_create, CreateEmployeeInput, Employee, EmployeeError, TOP_EARNERS_LIMIT,
};
use crate::http::response::{ApiError, ApiFailure};
use crate::http::server::AppState;

type HandlerResult<T> = Result<T, ApiFailure>;

fn fail(uri: &axum::http::Uri) -> impl FnOnce(EmployeeError) -> ApiFailure + '_ {
    move |e| ApiError::from(e).at(uri)
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn list_employees(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> HandlerResult<Json<Vec<Employee>>> {
    tracing::info!("Request: get all employees");
    let employees = state.employees.list().await.map_err(fail(&uri))?;
    Ok(Json(employees))
}

pub async fn search_employees(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(fragment): Path<String>,
) -> HandlerResult<Json<Vec<Employee>>> {
    tracing::info!(fragment = %fragment, "Request: search employees by name fragment");
    let employees = state.employees.search(&fragment).await.map_err(fail(&uri))?;
    Ok(Json(employees))
}

pub async fn get_employee(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> HandlerResult<Json<Employee>> {
    tracing::info!(id = %id, "Request: get employee by id");
    let employee = state.employees.get_by_id(&id).await.map_err(fail(&uri))?;
    Ok(Json(employee))
}

pub async fn highest_salary(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> HandlerResult<Json<u32>> {
    tracing::info!("Request: get highest salary");
    let salary = state.employees.max_salary().await.map_err(fail(&uri))?;
    Ok(Json(salary))
}

pub async fn top_earning_names(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> HandlerResult<Json<Vec<Option<String>>>> {
    tracing::info!(limit = TOP_EARNERS_LIMIT, "Request: get top earning employee names");
    let names = state
        .employees
        .top_earning_names(TOP_EARNERS_LIMIT)
        .await
        .map_err(fail(&uri))?;
    Ok(Json(names))
}

pub async fn create_employee(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<CreateEmployeeInput>, JsonRejection>,
) -> HandlerResult<Json<Employee>> {
    let Json(input) = payload.map_err(|e| ApiError::MalformedBody(e.body_text()).at(&uri))?;
    let request = validate_create(input).map_err(|errors| {
        tracing::warn!(errors = errors.len(), "Rejected invalid create request");
        ApiError::Validation(errors).at(&uri)
    })?;

    tracing::info!(name = %request.name, "Request: create employee");
    let employee = state.employees.create(&request).await.map_err(fail(&uri))?;
    Ok(Json(employee))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> HandlerResult<String> {
    tracing::info!(id = %id, "Request: delete employee by id");
    let name = state.employees.delete_by_id(&id).await.map_err(fail(&uri))?;
    Ok(format!("Deleted employee: {}", name))
}
