//! Employee domain: records, create validation and the service used by
//! the HTTP handlers.

pub mod service;
pub mod types;
pub mod validation;

pub use service::{EmployeeError, EmployeeResult, EmployeeService, TOP_EARNERS_LIMIT};
pub use types::{CreateEmployeeInput, CreateEmployeeRequest, Employee};
pub use validation::{validate_create, FieldError};
