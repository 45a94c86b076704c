//! Employee operations offered to the HTTP layer.
//!
//! Thin composition of the upstream client and the aggregation engine.
//! Aggregations fetch a fresh snapshot every time; nothing is cached.

use thiserror::Error;

use crate::aggregation;
use crate::employees::types::{CreateEmployeeRequest, Employee};
use crate::upstream::{UpstreamClient, UpstreamError, UpstreamOutcome};

/// Number of names returned by the top earners query.
pub const TOP_EARNERS_LIMIT: usize = 10;

/// Errors surfaced to the HTTP layer.
#[derive(Debug, Error)]
pub enum EmployeeError {
    #[error("Employee with ID '{0}' not found")]
    NotFound(String),

    /// The employee existed but could not be deleted: it has no name to
    /// delete by, or the upstream did not delete it.
    #[error("Failed to delete employee with ID {id}")]
    DeleteFailed { id: String },

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

pub type EmployeeResult<T> = Result<T, EmployeeError>;

/// Employee use cases backed by the upstream directory.
#[derive(Debug, Clone)]
pub struct EmployeeService {
    upstream: UpstreamClient,
}

impl EmployeeService {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }

    pub async fn list(&self) -> EmployeeResult<Vec<Employee>> {
        Ok(self.upstream.list_employees().await?)
    }

    pub async fn get_by_id(&self, id: &str) -> EmployeeResult<Employee> {
        self.upstream
            .get_employee_by_id(id)
            .await?
            .into_option()
            .ok_or_else(|| EmployeeError::NotFound(id.to_string()))
    }

    pub async fn create(&self, request: &CreateEmployeeRequest) -> EmployeeResult<Employee> {
        Ok(self.upstream.create_employee(request).await?)
    }

    /// Whether the upstream reported a deletion. Unknown names yield `false`.
    pub async fn delete_by_name(&self, name: &str) -> EmployeeResult<bool> {
        match self.upstream.delete_employee_by_name(name).await? {
            UpstreamOutcome::Success(deleted) => Ok(deleted),
            UpstreamOutcome::NotFound => Ok(false),
        }
    }

    /// Resolve the id to a name, then delete by that name.
    ///
    /// Returns the deleted employee's name. An unknown id, or an employee
    /// without a name, fails before any delete is sent.
    pub async fn delete_by_id(&self, id: &str) -> EmployeeResult<String> {
        let employee = match self.get_by_id(id).await {
            Ok(employee) => employee,
            Err(e) => {
                if matches!(e, EmployeeError::NotFound(_)) {
                    tracing::warn!(id, "Delete failed, employee not found");
                }
                return Err(e);
            }
        };
        let Some(name) = employee.name.filter(|n| !n.trim().is_empty()) else {
            tracing::error!(id, "Employee has no name to delete by");
            return Err(EmployeeError::DeleteFailed { id: id.to_string() });
        };

        if self.delete_by_name(&name).await? {
            tracing::info!(id, name = %name, "Employee deleted");
            Ok(name)
        } else {
            tracing::error!(id, name = %name, "Upstream did not delete existing employee");
            Err(EmployeeError::DeleteFailed { id: id.to_string() })
        }
    }

    /// Employees whose name contains `fragment`, ignoring case.
    pub async fn search(&self, fragment: &str) -> EmployeeResult<Vec<Employee>> {
        let snapshot = self.list().await?;
        Ok(aggregation::search_by_name_fragment(&snapshot, fragment))
    }

    /// Highest salary, or 0 when the directory is empty.
    pub async fn max_salary(&self) -> EmployeeResult<u32> {
        let snapshot = self.list().await?;
        Ok(aggregation::max_salary(&snapshot))
    }

    pub async fn top_earning_names(&self, n: usize) -> EmployeeResult<Vec<Option<String>>> {
        let snapshot = self.list().await?;
        Ok(aggregation::top_n_earning_names(&snapshot, n))
    }
}
