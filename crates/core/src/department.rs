use serde::{Deserialize, Serialize};

use crate::validation::{required_text, ValidationErrors};

/// Persisted department record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub id: i64,
    pub short_name: String,
    pub name: String,
}

/// Wire representation of a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDto {
    pub id: i64,
    pub short_name: String,
    pub name: String,
}

impl From<Department> for DepartmentDto {
    fn from(department: Department) -> Self {
        Self {
            id: department.id,
            short_name: department.short_name,
            name: department.name,
        }
    }
}

/// Request body accepted by create and update. Any `id` in the body is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentPayload {
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Validated department fields ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentDraft {
    pub short_name: String,
    pub name: String,
}

impl DepartmentPayload {
    pub fn validate(self) -> Result<DepartmentDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let short_name = required_text(
            &mut errors,
            "shortName",
            self.short_name,
            "Short name is required",
        );
        let name = required_text(&mut errors, "name", self.name, "Name is required");
        errors.finish(|| DepartmentDraft { short_name, name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_payload_becomes_draft() {
        let payload: DepartmentPayload = serde_json::from_str(
            r#"{"id": 42, "shortName": "IT", "name": "Information Technology"}"#,
        )
        .expect("payload");
        let draft = payload.validate().expect("valid");
        assert_eq!(
            draft,
            DepartmentDraft {
                short_name: "IT".into(),
                name: "Information Technology".into(),
            }
        );
    }

    #[test]
    fn blank_and_missing_fields_are_reported() {
        let payload: DepartmentPayload =
            serde_json::from_str(r#"{"shortName": "  "}"#).expect("payload");
        let errors = payload.validate().expect_err("invalid");
        assert_eq!(errors.get("shortName"), Some("Short name is required"));
        assert_eq!(errors.get("name"), Some("Name is required"));
    }

    #[test]
    fn dto_uses_camel_case() {
        let dto = DepartmentDto::from(Department {
            id: 1,
            short_name: "HR".into(),
            name: "Human Resources".into(),
        });
        let json = serde_json::to_value(&dto).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "shortName": "HR", "name": "Human Resources"})
        );
    }
}
