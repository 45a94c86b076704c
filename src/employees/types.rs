//! Employee records and create requests.

use serde::{Deserialize, Serialize};

/// An employee as reported by the upstream directory.
///
/// Field names follow the upstream wire format and are re-emitted unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Upstream-assigned identifier.
    pub id: String,

    #[serde(rename = "employee_name", default)]
    pub name: Option<String>,

    #[serde(rename = "employee_salary")]
    pub salary: u32,

    #[serde(rename = "employee_age")]
    pub age: u32,

    #[serde(rename = "employee_title", default)]
    pub title: Option<String>,

    #[serde(rename = "employee_email", default)]
    pub email: Option<String>,
}

/// Create payload exactly as received; every field may be missing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateEmployeeInput {
    pub name: Option<String>,
    pub salary: Option<i64>,
    pub age: Option<i64>,
    pub title: Option<String>,
}

/// A create request that passed validation. Serialized as the upstream body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub salary: u32,
    pub age: u32,
    pub title: String,
}
