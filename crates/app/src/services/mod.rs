//! CRUD services that sit between the HTTP handlers and the repositories.

use std::fmt;

use thiserror::Error;

use hr_records_storage::{DepartmentError, EmployeeError};

pub mod departments;
pub mod employees;

pub use departments::DepartmentService;
pub use employees::EmployeeService;

/// Entity kinds named in service error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Department,
    Employee,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Department => f.write_str("Department"),
            Self::Employee => f.write_str("Employee"),
        }
    }
}

/// Failures surfaced by the department and employee services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} not found with id: {id}")]
    NotFound { entity: Entity, id: i64 },
    #[error("Duplicate value '{value}' for field: {field}")]
    Duplicate { field: String, value: String },
    #[error("Department with id: {id} still has employees assigned")]
    DepartmentInUse { id: i64 },
    #[error("department store failure: {0}")]
    DepartmentStore(#[source] DepartmentError),
    #[error("employee store failure: {0}")]
    EmployeeStore(#[source] EmployeeError),
}

impl ServiceError {
    pub fn department_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: Entity::Department,
            id,
        }
    }

    pub fn employee_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: Entity::Employee,
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_messages_name_the_entity() {
        assert_eq!(
            ServiceError::department_not_found(999).to_string(),
            "Department not found with id: 999"
        );
        assert_eq!(
            ServiceError::employee_not_found(3).to_string(),
            "Employee not found with id: 3"
        );
    }

    #[test]
    fn duplicate_message_names_field_and_value() {
        let err = ServiceError::Duplicate {
            field: "code".into(),
            value: "EMP001".into(),
        };
        assert_eq!(err.to_string(), "Duplicate value 'EMP001' for field: code");
    }
}
