use serde::{Deserialize, Serialize};

use crate::validation::{bounded_int, required_text, IntBounds, ValidationErrors};

pub const MIN_AGE: i32 = 18;
pub const MAX_AGE: i32 = 65;

const AGE_BOUNDS: IntBounds = IntBounds {
    min: MIN_AGE,
    max: MAX_AGE,
    missing: "Age is required",
    below: "Age must be at least 18",
    above: "Age must be less than or equal to 65",
};

/// Persisted employee record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: i64,
    pub code: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub age: i32,
    pub gender: String,
    pub address: Option<String>,
    pub department_id: i64,
}

/// Wire representation of an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    pub id: i64,
    pub code: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub age: i32,
    pub gender: String,
    pub address: Option<String>,
    pub department_id: i64,
}

impl From<Employee> for EmployeeDto {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            code: employee.code,
            first_name: employee.first_name,
            last_name: employee.last_name,
            full_name: employee.full_name,
            age: employee.age,
            gender: employee.gender,
            address: employee.address,
            department_id: employee.department_id,
        }
    }
}

/// Request body accepted by create and update.
///
/// `id` and `fullName` are not part of the payload; serde drops them when a client sends them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub department_id: Option<i64>,
}

/// Validated employee fields ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDraft {
    pub code: String,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub gender: String,
    pub address: Option<String>,
    pub department_id: i64,
}

impl EmployeeDraft {
    /// Name stored alongside the record; recomputed on every write.
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}")
}

impl EmployeePayload {
    pub fn validate(self) -> Result<EmployeeDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let code = required_text(&mut errors, "code", self.code, "Code is required");
        let first_name = required_text(
            &mut errors,
            "firstName",
            self.first_name,
            "First name is required",
        );
        let last_name = required_text(
            &mut errors,
            "lastName",
            self.last_name,
            "Last name is required",
        );
        let age = bounded_int(&mut errors, "age", self.age, AGE_BOUNDS);
        let gender = required_text(&mut errors, "gender", self.gender, "Gender is required");
        let department_id = match self.department_id {
            Some(id) => id,
            None => {
                errors.add("departmentId", "Department ID is required");
                0
            }
        };

        errors.finish(|| EmployeeDraft {
            code,
            first_name,
            last_name,
            age,
            gender,
            address: self.address,
            department_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(age: i32) -> EmployeePayload {
        EmployeePayload {
            code: Some("EMP001".into()),
            first_name: Some("John".into()),
            last_name: Some("Doe".into()),
            age: Some(age),
            gender: Some("Male".into()),
            address: Some("123 Street".into()),
            department_id: Some(1),
        }
    }

    #[test]
    fn age_bounds_are_inclusive() {
        assert!(payload(18).validate().is_ok());
        assert!(payload(65).validate().is_ok());

        let below = payload(17).validate().expect_err("17 is too young");
        assert_eq!(below.get("age"), Some("Age must be at least 18"));
        assert_eq!(below.len(), 1);

        let above = payload(66).validate().expect_err("66 is too old");
        assert_eq!(above.get("age"), Some("Age must be less than or equal to 65"));
    }

    #[test]
    fn collects_every_failing_field() {
        let errors = EmployeePayload::default().validate().expect_err("empty body");
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["age", "code", "departmentId", "firstName", "gender", "lastName"]
        );
        assert_eq!(errors.get("departmentId"), Some("Department ID is required"));
        assert_eq!(errors.get("age"), Some("Age is required"));
    }

    #[test]
    fn full_name_joins_parts() {
        let draft = payload(30).validate().expect("valid");
        assert_eq!(draft.full_name(), "John Doe");
    }

    #[test]
    fn client_full_name_is_ignored() {
        let payload: EmployeePayload = serde_json::from_str(
            r#"{
                "id": 9,
                "code": "EMP002",
                "firstName": "Jane",
                "lastName": "Roe",
                "fullName": "Somebody Else",
                "age": 40,
                "gender": "Female",
                "departmentId": 3
            }"#,
        )
        .expect("payload");
        let draft = payload.validate().expect("valid");
        assert_eq!(draft.full_name(), "Jane Roe");
        assert_eq!(draft.address, None);
        assert_eq!(draft.department_id, 3);
    }

    #[test]
    fn dto_uses_camel_case() {
        let dto = EmployeeDto::from(Employee {
            id: 7,
            code: "EMP007".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            full_name: "John Doe".into(),
            age: 30,
            gender: "Male".into(),
            address: None,
            department_id: 2,
        });
        let json = serde_json::to_value(&dto).expect("serialize");
        assert_eq!(json["fullName"], "John Doe");
        assert_eq!(json["departmentId"], 2);
        assert!(json["address"].is_null());
    }
}
