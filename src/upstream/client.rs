//! HTTP client for the upstream employee directory.
//!
//! # Responsibilities
//! - Issue list / get-by-id / create / delete-by-name against the upstream
//! - Run every operation through the retry loop
//! - Translate status codes and transport errors into outcomes and errors
//!
//! Retried create and delete calls may apply twice upstream if an earlier
//! attempt landed before the error surfaced.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, StatusCode};
use url::Url;

use crate::employees::{CreateEmployeeRequest, Employee};
use crate::resilience::{is_retryable_status, retry, AttemptError, RetryError};
use crate::upstream::types::{
    AttemptFailure, DeleteByNameBody, Envelope, Operation, UpstreamError, UpstreamOutcome,
    UpstreamResult, UpstreamSettings,
};

/// Resilient client for the upstream directory. Cheap to clone.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    settings: Arc<UpstreamSettings>,
}

impl UpstreamClient {
    /// Create a client from settings fixed at startup.
    pub fn new(settings: UpstreamSettings) -> UpstreamResult<Self> {
        let mut builder = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout);
        if !settings.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build().map_err(UpstreamError::ClientBuild)?;

        tracing::info!(
            base_url = %settings.base_url,
            max_attempts = settings.retry_policy.max_attempts,
            base_delay_ms = settings.retry_policy.base_delay_ms,
            "Upstream client initialized"
        );

        Ok(Self {
            http,
            settings: Arc::new(settings),
        })
    }

    /// `{base}/employee[/<segment>]`, with the segment percent-encoded.
    fn endpoint(&self, id: Option<&str>) -> Url {
        let mut url = self.settings.base_url.clone();
        // base URLs are validated to be hierarchical, so this cannot fail
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("employee");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    /// Fetch the full employee listing.
    pub async fn list_employees(&self) -> UpstreamResult<Vec<Employee>> {
        tracing::info!("Fetching all employees from upstream");
        let url = self.endpoint(None);
        self.execute(Operation::ListEmployees, || self.http.get(url.clone()), decode_data)
            .await?
            .found(Operation::ListEmployees)
    }

    /// Fetch one employee; `NotFound` when the upstream has no such id.
    pub async fn get_employee_by_id(&self, id: &str) -> UpstreamResult<UpstreamOutcome<Employee>> {
        tracing::info!(id, "Fetching employee by id from upstream");
        let url = self.endpoint(Some(id));
        let outcome = self
            .execute(Operation::GetEmployeeById, || self.http.get(url.clone()), decode_data)
            .await?;
        if outcome.is_not_found() {
            tracing::warn!(id, "Employee not found upstream");
        }
        Ok(outcome)
    }

    /// Create an employee and return the upstream record, generated id included.
    pub async fn create_employee(&self, request: &CreateEmployeeRequest) -> UpstreamResult<Employee> {
        tracing::info!(name = %request.name, "Creating employee upstream");
        let url = self.endpoint(None);
        self.execute(
            Operation::CreateEmployee,
            || self.http.post(url.clone()).json(request),
            decode_data,
        )
        .await?
        .found(Operation::CreateEmployee)
    }

    /// Delete by name. `Success(false)` when the upstream answers that nothing
    /// was deleted, `NotFound` when it has no employee with that name.
    pub async fn delete_employee_by_name(&self, name: &str) -> UpstreamResult<UpstreamOutcome<bool>> {
        tracing::info!(name, "Deleting employee by name upstream");
        let url = self.endpoint(None);
        let body = DeleteByNameBody { name };
        let outcome = self
            .execute(
                Operation::DeleteEmployeeByName,
                || self.http.delete(url.clone()).json(&body),
                decode_deleted,
            )
            .await?;
        if outcome.is_not_found() {
            tracing::warn!(name, "Employee not found upstream for deletion");
        }
        Ok(outcome)
    }

    async fn execute<T, B, D>(
        &self,
        operation: Operation,
        build: B,
        decode: D,
    ) -> UpstreamResult<UpstreamOutcome<T>>
    where
        B: Fn() -> RequestBuilder,
        D: Fn(&[u8]) -> Result<T, serde_json::Error>,
    {
        let decode = &decode;
        let result = retry(&self.settings.retry_policy, operation.as_str(), |_| {
            self.attempt(operation, build(), decode)
        })
        .await;

        result.map_err(|e| match e {
            RetryError::Exhausted { attempts, last } => UpstreamError::Unavailable {
                operation,
                attempts,
                cause: last,
            },
            RetryError::Aborted { cause, .. } => UpstreamError::Unexpected { operation, cause },
        })
    }

    async fn attempt<T, D>(
        &self,
        operation: Operation,
        request: RequestBuilder,
        decode: &D,
    ) -> Result<UpstreamOutcome<T>, AttemptError<AttemptFailure>>
    where
        D: Fn(&[u8]) -> Result<T, serde_json::Error>,
    {
        let response = request.send().await.map_err(|e| self.transport_failure(e))?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND && operation.allows_not_found() {
            return Ok(UpstreamOutcome::NotFound);
        }

        let body = response.bytes().await.map_err(|e| self.transport_failure(e))?;

        if !status.is_success() {
            let failure = AttemptFailure::status(status, &body);
            return Err(if is_retryable_status(status) {
                AttemptError::Retryable(failure)
            } else {
                AttemptError::Fatal(failure)
            });
        }

        decode(&body)
            .map(UpstreamOutcome::Success)
            .map_err(|e| AttemptError::Fatal(AttemptFailure::Decode(e)))
    }

    fn transport_failure(&self, error: reqwest::Error) -> AttemptError<AttemptFailure> {
        let retryable = self.settings.retry_policy.retry_transport_errors && !error.is_builder();
        let failure = AttemptFailure::Transport(error);
        if retryable {
            AttemptError::Retryable(failure)
        } else {
            AttemptError::Fatal(failure)
        }
    }
}

impl<T> UpstreamOutcome<T> {
    /// Unwrap an outcome for operations where a 404 is never a valid answer.
    fn found(self, operation: Operation) -> UpstreamResult<T> {
        match self {
            UpstreamOutcome::Success(value) => Ok(value),
            UpstreamOutcome::NotFound => Err(UpstreamError::Unexpected {
                operation,
                cause: AttemptFailure::status(StatusCode::NOT_FOUND, b""),
            }),
        }
    }
}

fn decode_data<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice::<Envelope<T>>(body).map(|envelope| envelope.data)
}

/// Deletes succeed with an empty body; a `{"data": <bool>}` body is honored.
fn decode_deleted(body: &[u8]) -> Result<bool, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(true);
    }
    let deleted = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("data").and_then(serde_json::Value::as_bool))
        .unwrap_or(true);
    Ok(deleted)
}
