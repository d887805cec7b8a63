use std::{str::FromStr, time::Duration};

use sqlx::{
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use thiserror::Error;

use hr_records_core::{Department, DepartmentDraft, Employee, EmployeeDraft};

mod constraint;

use constraint::{classify, Violation};

/// Top-level database handle that owns the SQLite connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Establishes a new SQLite connection pool for the provided connection string.
    ///
    /// The database file is created when missing and foreign keys are enforced on
    /// every pooled connection.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(StorageError::Connect)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(StorageError::Connect)?;

        apply_pragmas(&pool).await?;

        Ok(Self { pool })
    }

    /// Applies migrations located under `migrations/`.
    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(StorageError::Migration)?;
        Ok(())
    }

    /// Issues a trivial query to confirm the store answers.
    pub async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Returns a handle for the `departments` table.
    pub fn departments(&self) -> DepartmentRepository {
        DepartmentRepository {
            pool: self.pool.clone(),
        }
    }

    /// Returns a handle for the `employees` table.
    pub fn employees(&self) -> EmployeeRepository {
        EmployeeRepository {
            pool: self.pool.clone(),
        }
    }

    /// Exposes the inner pool when lower level access is required.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

async fn apply_pragmas(pool: &SqlitePool) -> Result<(), StorageError> {
    sqlx::query("PRAGMA journal_mode = WAL;")
        .fetch_one(pool)
        .await
        .map_err(StorageError::Pragma)?;

    sqlx::query("PRAGMA synchronous = NORMAL;")
        .execute(pool)
        .await
        .map_err(StorageError::Pragma)?;

    Ok(())
}

/// General storage level errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to connect to sqlite: {0}")]
    Connect(sqlx::Error),
    #[error("failed to apply pragma: {0}")]
    Pragma(sqlx::Error),
    #[error("failed to run database migrations: {0}")]
    Migration(MigrateError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct DepartmentRow {
    id: i64,
    short_name: String,
    name: String,
}

impl DepartmentRow {
    fn into_domain(self) -> Department {
        Department {
            id: self.id,
            short_name: self.short_name,
            name: self.name,
        }
    }
}

/// Repository for the `departments` table.
#[derive(Clone)]
pub struct DepartmentRepository {
    pool: SqlitePool,
}

impl DepartmentRepository {
    /// Lists every department ordered by id.
    pub async fn list(&self) -> Result<Vec<Department>, DepartmentError> {
        let rows = sqlx::query_as::<_, DepartmentRow>(
            "SELECT id, short_name, name FROM departments ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DepartmentRow::into_domain).collect())
    }

    /// Loads a single department.
    pub async fn fetch(&self, id: i64) -> Result<Department, DepartmentError> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            "SELECT id, short_name, name FROM departments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DepartmentError::NotFound)?;

        Ok(row.into_domain())
    }

    /// Inserts a department and returns it with the assigned id.
    pub async fn insert(&self, draft: &DepartmentDraft) -> Result<Department, DepartmentError> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            "INSERT INTO departments (short_name, name) VALUES (?, ?) \
             RETURNING id, short_name, name",
        )
        .bind(&draft.short_name)
        .bind(&draft.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_domain())
    }

    /// Replaces the mutable columns of an existing department.
    pub async fn update(
        &self,
        id: i64,
        draft: &DepartmentDraft,
    ) -> Result<Department, DepartmentError> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            "UPDATE departments SET short_name = ?, name = ? WHERE id = ? \
             RETURNING id, short_name, name",
        )
        .bind(&draft.short_name)
        .bind(&draft.name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DepartmentError::NotFound)?;

        Ok(row.into_domain())
    }

    /// Removes a department. Fails with [`DepartmentError::InUse`] while employees reference it.
    pub async fn delete(&self, id: i64) -> Result<(), DepartmentError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| match classify(err) {
                Violation::ForeignKey => DepartmentError::InUse,
                Violation::Unique { source, .. } | Violation::Other(source) => {
                    DepartmentError::Database(source)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(DepartmentError::NotFound);
        }
        Ok(())
    }

    /// Returns `true` when a department with the id exists.
    pub async fn exists(&self, id: i64) -> Result<bool, DepartmentError> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM departments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }
}

/// Errors raised by the department repository.
#[derive(Debug, Error)]
pub enum DepartmentError {
    #[error("department not found")]
    NotFound,
    #[error("department is still referenced by employees")]
    InUse,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    id: i64,
    code: String,
    first_name: String,
    last_name: String,
    full_name: String,
    age: i32,
    gender: String,
    address: Option<String>,
    department_id: i64,
}

impl EmployeeRow {
    fn into_domain(self) -> Employee {
        Employee {
            id: self.id,
            code: self.code,
            first_name: self.first_name,
            last_name: self.last_name,
            full_name: self.full_name,
            age: self.age,
            gender: self.gender,
            address: self.address,
            department_id: self.department_id,
        }
    }
}

const EMPLOYEE_COLUMNS: &str =
    "id, code, first_name, last_name, full_name, age, gender, address, department_id";

/// Repository for the `employees` table.
#[derive(Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Lists every employee ordered by id.
    pub async fn list(&self) -> Result<Vec<Employee>, EmployeeError> {
        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(EmployeeRow::into_domain).collect())
    }

    /// Loads a single employee.
    pub async fn fetch(&self, id: i64) -> Result<Employee, EmployeeError> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(EmployeeError::NotFound)?;

        Ok(row.into_domain())
    }

    /// Inserts an employee, deriving `full_name` from the draft.
    pub async fn insert(&self, draft: &EmployeeDraft) -> Result<Employee, EmployeeError> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "INSERT INTO employees \
             (code, first_name, last_name, full_name, age, gender, address, department_id) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(&draft.code)
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(draft.full_name())
        .bind(draft.age)
        .bind(&draft.gender)
        .bind(&draft.address)
        .bind(draft.department_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| EmployeeError::from_write(err, draft))?;

        Ok(row.into_domain())
    }

    /// Overwrites every mutable column of an existing employee, recomputing `full_name`.
    pub async fn update(&self, id: i64, draft: &EmployeeDraft) -> Result<Employee, EmployeeError> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "UPDATE employees \
             SET code = ?, first_name = ?, last_name = ?, full_name = ?, age = ?, \
                 gender = ?, address = ?, department_id = ? \
             WHERE id = ? \
             RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(&draft.code)
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(draft.full_name())
        .bind(draft.age)
        .bind(&draft.gender)
        .bind(&draft.address)
        .bind(draft.department_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| EmployeeError::from_write(err, draft))?
        .ok_or(EmployeeError::NotFound)?;

        Ok(row.into_domain())
    }

    /// Removes an employee.
    pub async fn delete(&self, id: i64) -> Result<(), EmployeeError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EmployeeError::NotFound);
        }
        Ok(())
    }
}

/// Errors raised by the employee repository.
#[derive(Debug, Error)]
pub enum EmployeeError {
    #[error("employee not found")]
    NotFound,
    #[error("duplicate value '{value}' for field: {field}")]
    Duplicate { field: String, value: String },
    #[error("referenced department does not exist")]
    MissingDepartment,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl EmployeeError {
    fn from_write(err: sqlx::Error, draft: &EmployeeDraft) -> Self {
        match classify(err) {
            Violation::Unique { field, .. } => {
                let value = match field.as_str() {
                    "code" => draft.code.clone(),
                    _ => "unknown value".to_string(),
                };
                Self::Duplicate { field, value }
            }
            Violation::ForeignKey => Self::MissingDepartment,
            Violation::Other(err) => Self::Database(err),
        }
    }
}
