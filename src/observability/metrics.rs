//! Metrics collection and exposition.
//!
//! # Metrics
//! - `facade_requests_total` (counter): inbound requests by method, route, status
//! - `facade_request_duration_seconds` (histogram): inbound latency
//! - `facade_upstream_attempts_total` (counter): upstream attempts by operation, outcome
//! - `facade_upstream_retries_total` (counter): backoff sleeps by operation
//! - `facade_upstream_exhausted_total` (counter): operations that ran out of attempts
//!
//! Recording is a no-op until a recorder is installed, so library code and
//! tests can call these freely.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed inbound request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let status = status.to_string();
    counter!(
        "facade_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "facade_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one upstream attempt and how it ended.
pub fn record_upstream_attempt(operation: &'static str, outcome: &'static str) {
    counter!(
        "facade_upstream_attempts_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a backoff sleep before another attempt.
pub fn record_upstream_retry(operation: &'static str) {
    counter!("facade_upstream_retries_total", "operation" => operation).increment(1);
}

/// Record an operation that used up its attempt budget.
pub fn record_upstream_exhausted(operation: &'static str) {
    counter!("facade_upstream_exhausted_total", "operation" => operation).increment(1);
}
