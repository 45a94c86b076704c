//! Upstream employee directory access.
//!
//! # Data Flow
//! ```text
//! EmployeeService
//!     → client.rs (build request, one attempt)
//!     → resilience::retries (classify, back off, retry)
//!     → UpstreamOutcome (Success / NotFound) or UpstreamError
//! ```
//!
//! # Design Decisions
//! - Settings (base URL, timeouts, retry policy) are immutable and passed in
//! - Transient failures never escape; only the terminal error does
//! - "Not found" is an outcome, not an error

pub mod client;
pub mod types;

pub use client::UpstreamClient;
pub use types::{
    AttemptFailure, Operation, UpstreamError, UpstreamOutcome, UpstreamResult, UpstreamSettings,
};
