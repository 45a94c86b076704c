//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, upstream client, retry loop produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! Request ids are attached by the HTTP layer and show up on the trace spans.

pub mod logging;
pub mod metrics;
