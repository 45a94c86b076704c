//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request id, span, metrics)
//!     → handlers.rs (validate, call EmployeeService)
//!     → response.rs (map failures to status + JSON body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{ApiError, ApiErrorResponse, ApiFailure};
pub use server::{AppState, HttpServer};
