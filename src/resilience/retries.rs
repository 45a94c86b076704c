//! Retry loop for upstream operations.
//!
//! # Responsibilities
//! - Decide which upstream failures are worth another attempt
//! - Run attempts strictly one after another with exponential backoff
//! - Escalate once the attempt budget is spent
//!
//! # Design Decisions
//! - The loop never substitutes a value: it ends in success or an error
//! - "Not found" is a successful attempt, never an error, so it is not retried
//! - 5xx and 429 are retryable; connection errors are configurable

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;

use crate::config::RetryConfig;
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;

/// Immutable retry policy shared by every upstream operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub multiplier: u32,
    pub max_delay_ms: u64,
    pub jitter_percent: u8,
    pub retry_transport_errors: bool,
}

impl RetryPolicy {
    /// Delay to wait before retry number `retry` (1-based).
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        calculate_backoff(
            retry,
            self.base_delay_ms,
            self.multiplier,
            self.max_delay_ms,
            self.jitter_percent,
        )
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay_ms: config.base_delay_ms,
            multiplier: config.multiplier,
            max_delay_ms: config.max_delay_ms,
            jitter_percent: config.jitter_percent,
            retry_transport_errors: config.retry_transport_errors,
        }
    }
}

/// Check whether an upstream status signals a transient condition.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// How a single failed attempt should be treated.
#[derive(Debug)]
pub enum AttemptError<E> {
    /// Transient; try again if the budget allows.
    Retryable(E),
    /// Permanent; stop immediately.
    Fatal(E),
}

/// Terminal failure of a retried operation.
#[derive(Debug)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error. Carries the last one.
    Exhausted { attempts: u32, last: E },
    /// An attempt failed with a non-retryable error.
    Aborted { attempt: u32, cause: E },
}

/// Run `attempt` until it succeeds, fails permanently, or the budget runs out.
///
/// `attempt` receives the 1-based attempt number. The backoff is awaited
/// between attempts; nothing runs in parallel.
pub async fn retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation: &'static str,
    mut attempt: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AttemptError<E>>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt_no = 0;

    loop {
        attempt_no += 1;
        tracing::debug!(operation, attempt = attempt_no, "Calling upstream");

        match attempt(attempt_no).await {
            Ok(value) => {
                metrics::record_upstream_attempt(operation, "success");
                return Ok(value);
            }
            Err(AttemptError::Fatal(cause)) => {
                metrics::record_upstream_attempt(operation, "fatal");
                tracing::error!(operation, attempt = attempt_no, error = %cause, "Upstream call failed permanently");
                return Err(RetryError::Aborted {
                    attempt: attempt_no,
                    cause,
                });
            }
            Err(AttemptError::Retryable(cause)) => {
                metrics::record_upstream_attempt(operation, "retryable");

                if attempt_no >= max_attempts {
                    metrics::record_upstream_exhausted(operation);
                    tracing::error!(
                        operation,
                        attempts = attempt_no,
                        error = %cause,
                        "All retries failed"
                    );
                    return Err(RetryError::Exhausted {
                        attempts: attempt_no,
                        last: cause,
                    });
                }

                let delay = policy.delay_before_retry(attempt_no);
                metrics::record_upstream_retry(operation);
                tracing::warn!(
                    operation,
                    attempt = attempt_no,
                    delay = ?delay,
                    error = %cause,
                    "Retrying upstream call"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
