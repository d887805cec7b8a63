use tracing::info;

use hr_records_core::{EmployeeDraft, EmployeeDto};
use hr_records_storage::{Database, EmployeeError, EmployeeRepository};

use super::{DepartmentService, ServiceError};

/// CRUD operations over employees. Department references are resolved through
/// [`DepartmentService`] before any write.
#[derive(Clone)]
pub struct EmployeeService {
    repo: EmployeeRepository,
    departments: DepartmentService,
}

impl EmployeeService {
    pub fn new(database: &Database, departments: DepartmentService) -> Self {
        Self {
            repo: database.employees(),
            departments,
        }
    }

    pub async fn list_all(&self) -> Result<Vec<EmployeeDto>, ServiceError> {
        let employees = self.repo.list().await.map_err(ServiceError::EmployeeStore)?;
        Ok(employees.into_iter().map(EmployeeDto::from).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<EmployeeDto, ServiceError> {
        self.repo
            .fetch(id)
            .await
            .map(EmployeeDto::from)
            .map_err(|err| match err {
                EmployeeError::NotFound => ServiceError::employee_not_found(id),
                other => ServiceError::EmployeeStore(other),
            })
    }

    /// Creates an employee in an existing department. `fullName` is derived from the draft.
    pub async fn create(&self, draft: EmployeeDraft) -> Result<EmployeeDto, ServiceError> {
        self.departments.ensure_exists(draft.department_id).await?;
        let employee = self
            .repo
            .insert(&draft)
            .await
            .map_err(|err| write_error(err, &draft))?;
        info!(
            stage = "service",
            employee_id = employee.id,
            department_id = employee.department_id,
            "employee created"
        );
        Ok(employee.into())
    }

    /// Overwrites every mutable field of an existing employee.
    pub async fn update(&self, id: i64, draft: EmployeeDraft) -> Result<EmployeeDto, ServiceError> {
        self.get_by_id(id).await?;
        self.departments.ensure_exists(draft.department_id).await?;
        let employee = self.repo.update(id, &draft).await.map_err(|err| match err {
            EmployeeError::NotFound => ServiceError::employee_not_found(id),
            other => write_error(other, &draft),
        })?;
        info!(
            stage = "service",
            employee_id = id,
            department_id = employee.department_id,
            "employee updated"
        );
        Ok(employee.into())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        info!(stage = "service", employee_id = id, "deleting employee");
        self.get_by_id(id).await?;
        self.repo.delete(id).await.map_err(|err| match err {
            EmployeeError::NotFound => ServiceError::employee_not_found(id),
            other => ServiceError::EmployeeStore(other),
        })
    }
}

fn write_error(err: EmployeeError, draft: &EmployeeDraft) -> ServiceError {
    match err {
        EmployeeError::Duplicate { field, value } => ServiceError::Duplicate { field, value },
        // The department vanished between the existence check and the write.
        EmployeeError::MissingDepartment => ServiceError::department_not_found(draft.department_id),
        other => ServiceError::EmployeeStore(other),
    }
}
