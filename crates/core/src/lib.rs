//! Domain types shared by the storage layer and the HTTP application.
//!
//! Entities mirror the persisted rows, DTOs are the JSON shapes returned to
//! clients and payloads are the raw request bodies that must pass validation
//! before any write.

pub mod department;
pub mod employee;
pub mod validation;

pub use department::{Department, DepartmentDraft, DepartmentDto, DepartmentPayload};
pub use employee::{full_name, Employee, EmployeeDraft, EmployeeDto, EmployeePayload};
pub use validation::ValidationErrors;
