use tracing::info;

use hr_records_core::{DepartmentDraft, DepartmentDto};
use hr_records_storage::{Database, DepartmentError, DepartmentRepository};

use super::ServiceError;

/// CRUD operations over departments.
#[derive(Clone)]
pub struct DepartmentService {
    repo: DepartmentRepository,
}

impl DepartmentService {
    pub fn new(database: &Database) -> Self {
        Self {
            repo: database.departments(),
        }
    }

    /// Lists every department ordered by id.
    pub async fn list_all(&self) -> Result<Vec<DepartmentDto>, ServiceError> {
        let departments = self.repo.list().await.map_err(store_error)?;
        Ok(departments.into_iter().map(DepartmentDto::from).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<DepartmentDto, ServiceError> {
        self.repo
            .fetch(id)
            .await
            .map(DepartmentDto::from)
            .map_err(|err| not_found_or_store(err, id))
    }

    pub async fn create(&self, draft: DepartmentDraft) -> Result<DepartmentDto, ServiceError> {
        let department = self.repo.insert(&draft).await.map_err(store_error)?;
        info!(stage = "service", department_id = department.id, "department created");
        Ok(department.into())
    }

    /// Replaces `shortName` and `name` of an existing department.
    pub async fn update(
        &self,
        id: i64,
        draft: DepartmentDraft,
    ) -> Result<DepartmentDto, ServiceError> {
        self.repo
            .fetch(id)
            .await
            .map_err(|err| not_found_or_store(err, id))?;
        let department = self
            .repo
            .update(id, &draft)
            .await
            .map_err(|err| not_found_or_store(err, id))?;
        info!(stage = "service", department_id = id, "department updated");
        Ok(department.into())
    }

    /// Removes a department; refuses while employees still reference it.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        info!(stage = "service", department_id = id, "deleting department");
        self.repo
            .fetch(id)
            .await
            .map_err(|err| not_found_or_store(err, id))?;
        self.repo.delete(id).await.map_err(|err| match err {
            DepartmentError::InUse => ServiceError::DepartmentInUse { id },
            other => not_found_or_store(other, id),
        })
    }

    /// Confirms that a department exists, for callers that reference one by id.
    pub async fn ensure_exists(&self, id: i64) -> Result<(), ServiceError> {
        if self.repo.exists(id).await.map_err(store_error)? {
            Ok(())
        } else {
            Err(ServiceError::department_not_found(id))
        }
    }
}

fn not_found_or_store(err: DepartmentError, id: i64) -> ServiceError {
    match err {
        DepartmentError::NotFound => ServiceError::department_not_found(id),
        other => store_error(other),
    }
}

fn store_error(err: DepartmentError) -> ServiceError {
    ServiceError::DepartmentStore(err)
}
