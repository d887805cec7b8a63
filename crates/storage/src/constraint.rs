//! Helpers for turning SQLite constraint failures into domain errors.

use std::borrow::Cow;

use sqlx::error::DatabaseError;

pub(crate) const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";
pub(crate) const SQLITE_CONSTRAINT_FOREIGNKEY: &str = "787";

pub(crate) const UNKNOWN_FIELD: &str = "unknown field";

const SQLITE_UNIQUE_PREFIX: &str = "UNIQUE constraint failed: ";

/// Constraint class of a failed write.
#[derive(Debug)]
pub(crate) enum Violation {
    Unique { field: String, source: sqlx::Error },
    ForeignKey,
    Other(sqlx::Error),
}

pub(crate) fn classify(err: sqlx::Error) -> Violation {
    let sqlx::Error::Database(db_err) = err else {
        return Violation::Other(err);
    };
    let code = db_err.code().map(Cow::into_owned);
    match code.as_deref() {
        Some(SQLITE_CONSTRAINT_UNIQUE) => Violation::Unique {
            field: unique_violation_field(&*db_err),
            source: sqlx::Error::Database(db_err),
        },
        Some(SQLITE_CONSTRAINT_FOREIGNKEY) => Violation::ForeignKey,
        _ => Violation::Other(sqlx::Error::Database(db_err)),
    }
}

fn unique_violation_field(db_err: &dyn DatabaseError) -> String {
    db_err
        .constraint()
        .and_then(field_from_constraint)
        .or_else(|| field_from_message(db_err.message()))
        .unwrap_or(UNKNOWN_FIELD)
        .to_string()
}

/// Extracts the field from a `table_field_suffix` constraint name.
///
/// Best effort: a multi-word column such as `first_name` yields only `first`.
pub(crate) fn field_from_constraint(name: &str) -> Option<&str> {
    let mut parts = name.split('_');
    let _table = parts.next()?;
    parts.next().filter(|field| !field.is_empty())
}

/// Extracts the first column from SQLite's `UNIQUE constraint failed: table.column` message.
pub(crate) fn field_from_message(message: &str) -> Option<&str> {
    let columns = message.strip_prefix(SQLITE_UNIQUE_PREFIX)?;
    let first = columns.split(',').next()?.trim();
    first
        .rsplit_once('.')
        .map(|(_, column)| column)
        .filter(|column| !column.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_name_yields_middle_token() {
        assert_eq!(field_from_constraint("employees_code_unique"), Some("code"));
        assert_eq!(field_from_constraint("employees_code"), Some("code"));
        assert_eq!(field_from_constraint("employees"), None);
        assert_eq!(field_from_constraint("employees__unique"), None);
    }

    #[test]
    fn sqlite_message_yields_column() {
        assert_eq!(
            field_from_message("UNIQUE constraint failed: employees.code"),
            Some("code")
        );
        assert_eq!(
            field_from_message("UNIQUE constraint failed: t.a, t.b"),
            Some("a")
        );
        assert_eq!(field_from_message("NOT NULL constraint failed: t.a"), None);
    }
}
