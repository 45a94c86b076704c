//! Error responses.
//!
//! # Responsibilities
//! - Map validation, not-found, upstream and internal failures to status codes
//! - Render a uniform JSON error body
//! - Log upstream causes without exposing them to clients
//!
//! # Status Mapping
//! ```text
//! Validation / malformed body  → 400 Validation Error
//! Not found                    → 404 Not Found
//! Upstream retries exhausted   → 503 Service Unavailable
//! Anything else                → 500 Internal Server Error
//! ```

use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::employees::{EmployeeError, FieldError};
use crate::upstream::UpstreamError;

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
}

/// Client-facing failure of a request.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("Validation failed: [body: {0}]")]
    MalformedBody(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Service is temporarily unavailable, please try again later")]
    Unavailable(#[source] UpstreamError),

    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: Option<UpstreamError>,
    },
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody(_) => "Validation Error",
            ApiError::NotFound(_) => "Not Found",
            ApiError::Unavailable(_) => "Service Unavailable",
            ApiError::Internal { .. } => "Internal Server Error",
        }
    }

    /// Attach the request path the error is reported for.
    pub fn at(self, uri: &Uri) -> ApiFailure {
        ApiFailure {
            error: self,
            path: uri.path().to_string(),
        }
    }
}

impl From<EmployeeError> for ApiError {
    fn from(error: EmployeeError) -> Self {
        match error {
            EmployeeError::NotFound(_) => ApiError::NotFound(error.to_string()),
            EmployeeError::DeleteFailed { .. } => ApiError::Internal {
                message: error.to_string(),
                source: None,
            },
            EmployeeError::Upstream(e @ UpstreamError::Unavailable { .. }) => ApiError::Unavailable(e),
            EmployeeError::Upstream(e) => ApiError::Internal {
                message: "Unexpected response from the employee directory".to_string(),
                source: Some(e),
            },
        }
    }
}

/// An [`ApiError`] bound to the request path; what handlers return.
#[derive(Debug)]
pub struct ApiFailure {
    pub error: ApiError,
    pub path: String,
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = self.error.status();

        match &self.error {
            ApiError::Unavailable(cause) => {
                tracing::error!(path = %self.path, error = %cause, "Upstream unavailable");
            }
            ApiError::Internal {
                source: Some(cause),
                ..
            } => {
                tracing::error!(path = %self.path, error = %cause, "Upstream call failed");
            }
            ApiError::Internal { message, .. } => {
                tracing::error!(path = %self.path, error = %message, "Request failed");
            }
            _ => {
                tracing::debug!(path = %self.path, status = %status, error = %self.error, "Request rejected");
            }
        }

        let body = ApiErrorResponse {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: self.error.title().to_string(),
            message: self.error.to_string(),
            path: self.path,
        };
        (status, Json(body)).into_response()
    }
}
