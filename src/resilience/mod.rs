//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream operation:
//!     → retries.rs (run attempt, classify failure)
//!     → On retryable failure: backoff.rs (compute delay), sleep, try again
//!     → On exhaustion: terminal error carrying the last cause
//! ```
//!
//! # Design Decisions
//! - Per-attempt deadlines belong to the HTTP transport, not to this loop
//! - Retries are sequential; a logical operation never fans out
//! - Recovery always escalates, it never fabricates a fallback value

pub mod backoff;
pub mod retries;

pub use retries::{is_retryable_status, retry, AttemptError, RetryError, RetryPolicy};
