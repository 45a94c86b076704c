//! Aggregations over an employee snapshot.
//!
//! Pure and synchronous: no I/O, no shared state. Callers fetch a fresh
//! snapshot per request and hand it in.

pub mod engine;

pub use engine::{max_salary, search_by_name_fragment, top_n_earning_names};
