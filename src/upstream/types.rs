//! Upstream wire types, outcomes and error definitions.

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::{RetryConfig, UpstreamConfig};
use crate::resilience::RetryPolicy;

/// Longest upstream error body kept for diagnostics.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// The four upstream operations, used as log and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListEmployees,
    GetEmployeeById,
    CreateEmployee,
    DeleteEmployeeByName,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ListEmployees => "list_employees",
            Operation::GetEmployeeById => "get_employee_by_id",
            Operation::CreateEmployee => "create_employee",
            Operation::DeleteEmployeeByName => "delete_employee_by_name",
        }
    }

    /// Whether a 404 is a legitimate answer rather than a failure.
    pub fn allows_not_found(&self) -> bool {
        matches!(self, Operation::GetEmployeeById | Operation::DeleteEmployeeByName)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an upstream operation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamOutcome<T> {
    Success(T),
    /// The upstream reported that the entity does not exist.
    NotFound,
}

impl<T> UpstreamOutcome<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            UpstreamOutcome::Success(value) => Some(value),
            UpstreamOutcome::NotFound => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamOutcome::NotFound)
    }
}

/// Why a single attempt failed.
#[derive(Debug, Error)]
pub enum AttemptFailure {
    #[error("upstream responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("undecodable response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl AttemptFailure {
    pub fn status(status: StatusCode, body: &[u8]) -> Self {
        let body: String = String::from_utf8_lossy(body)
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect();
        AttemptFailure::Status { status, body }
    }
}

/// Terminal failure of an upstream operation.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Every attempt hit a transient failure.
    #[error("{operation} unavailable after {attempts} attempts: {cause}")]
    Unavailable {
        operation: Operation,
        attempts: u32,
        #[source]
        cause: AttemptFailure,
    },

    /// A failure that retrying cannot fix (unexpected status, bad payload).
    #[error("{operation} failed: {cause}")]
    Unexpected {
        operation: Operation,
        #[source]
        cause: AttemptFailure,
    },

    #[error("invalid upstream base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Immutable client configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub use_system_proxy: bool,
    pub retry_policy: RetryPolicy,
}

impl UpstreamSettings {
    pub fn new(base_url: &str, retry_policy: RetryPolicy) -> UpstreamResult<Self> {
        let defaults = UpstreamConfig::default();
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            connect_timeout: Duration::from_secs(defaults.connect_timeout_secs),
            request_timeout: Duration::from_secs(defaults.request_timeout_secs),
            use_system_proxy: defaults.use_system_proxy,
            retry_policy,
        })
    }

    pub fn from_config(upstream: &UpstreamConfig, retries: &RetryConfig) -> UpstreamResult<Self> {
        Ok(Self {
            base_url: parse_base_url(&upstream.base_url)?,
            connect_timeout: Duration::from_secs(upstream.connect_timeout_secs),
            request_timeout: Duration::from_secs(upstream.request_timeout_secs),
            use_system_proxy: upstream.use_system_proxy,
            retry_policy: RetryPolicy::from(retries),
        })
    }
}

fn parse_base_url(raw: &str) -> UpstreamResult<Url> {
    let invalid = |reason: String| UpstreamError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("cannot be a base".to_string()));
    }
    Ok(url)
}

/// `{ "data": ... }` wrapper used by every upstream payload.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Body of the delete-by-name call.
#[derive(Debug, Serialize)]
pub struct DeleteByNameBody<'a> {
    pub name: &'a str,
}
