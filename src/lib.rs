//! Employee directory facade library.
//!
//! Re-exposes an upstream employee-directory API with input validation,
//! case-insensitive search, salary aggregations and retry/backoff around
//! every upstream call.

pub mod aggregation;
pub mod config;
pub mod employees;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod upstream;

pub use config::schema::FacadeConfig;
pub use employees::EmployeeService;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use upstream::UpstreamClient;
