//! Create-request validation.
//!
//! Runs before the upstream client is involved and reports every failing
//! field at once.

use std::fmt;

use crate::employees::types::{CreateEmployeeInput, CreateEmployeeRequest};

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}: {}]", self.field, self.message)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Validate a raw create payload.
pub fn validate_create(input: CreateEmployeeInput) -> Result<CreateEmployeeRequest, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = non_blank(input.name);
    if name.is_none() {
        errors.push(FieldError {
            field: "name",
            message: "Name is required",
        });
    }

    let salary = match input.salary {
        None => {
            errors.push(FieldError {
                field: "salary",
                message: "Salary is required",
            });
            None
        }
        Some(s) if s < 1 => {
            errors.push(FieldError {
                field: "salary",
                message: "Salary must be greater than 0",
            });
            None
        }
        Some(s) => match u32::try_from(s) {
            Ok(s) => Some(s),
            Err(_) => {
                errors.push(FieldError {
                    field: "salary",
                    message: "Salary is too large",
                });
                None
            }
        },
    };

    let age = match input.age {
        None => {
            errors.push(FieldError {
                field: "age",
                message: "Age is required",
            });
            None
        }
        Some(a) if a < 1 => {
            errors.push(FieldError {
                field: "age",
                message: "Age must be greater than 0",
            });
            None
        }
        Some(a) => match u32::try_from(a) {
            Ok(a) => Some(a),
            Err(_) => {
                errors.push(FieldError {
                    field: "age",
                    message: "Age is too large",
                });
                None
            }
        },
    };

    let title = non_blank(input.title);
    if title.is_none() {
        errors.push(FieldError {
            field: "title",
            message: "Title is required",
        });
    }

    match (name, salary, age, title) {
        (Some(name), Some(salary), Some(age), Some(title)) if errors.is_empty() => {
            Ok(CreateEmployeeRequest {
                name,
                salary,
                age,
                title,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, salary: i64, age: i64, title: &str) -> CreateEmployeeInput {
        CreateEmployeeInput {
            name: Some(name.to_string()),
            salary: Some(salary),
            age: Some(age),
            title: Some(title.to_string()),
        }
    }

    #[test]
    fn test_valid_input() {
        let request = validate_create(input("Jill", 100, 30, "Manager")).unwrap();
        assert_eq!(request.name, "Jill");
        assert_eq!(request.salary, 100);
        assert_eq!(request.age, 30);
        assert_eq!(request.title, "Manager");
    }

    #[test]
    fn test_empty_input_reports_every_field() {
        let errors = validate_create(CreateEmployeeInput::default()).unwrap_err();
        let messages: Vec<_> = errors.iter().map(|e| e.message).collect();
        assert_eq!(
            messages,
            vec![
                "Name is required",
                "Salary is required",
                "Age is required",
                "Title is required",
            ]
        );
    }

    #[test]
    fn test_blank_strings_are_missing() {
        let errors = validate_create(input("   ", 100, 30, "")).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "title"]);
    }

    #[test]
    fn test_salary_must_be_positive() {
        for salary in [0, -5] {
            let errors = validate_create(input("Jill", salary, 30, "Manager")).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].to_string(), "[salary: Salary must be greater than 0]");
        }
    }

    #[test]
    fn test_minimum_salary_accepted() {
        assert!(validate_create(input("Jill", 1, 30, "Manager")).is_ok());
    }

    #[test]
    fn test_age_must_be_positive() {
        for age in [0, -1] {
            let errors = validate_create(input("Jill", 100, age, "Manager")).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].to_string(), "[age: Age must be greater than 0]");
        }
        assert_eq!(validate_create(input("Jill", 100, 1, "Manager")).unwrap().age, 1);
    }

    #[test]
    fn test_age_beyond_range_is_rejected() {
        let errors = validate_create(input("Jill", 100, i64::from(u32::MAX) + 1, "Manager"))
            .unwrap_err();
        assert_eq!(errors[0].to_string(), "[age: Age is too large]");
    }
}
