use axum::{extract::rejection::JsonRejection, Json};

use crate::problem::ApiError;

/// Parses a numeric path identifier, rejecting non-numeric and non-positive values.
pub fn parse_id(parameter: &'static str, raw: &str) -> Result<i64, ApiError> {
    let value = raw.parse::<i64>().map_err(|_| ApiError::TypeMismatch {
        parameter,
        value: raw.to_string(),
        expected: "i64",
    })?;
    if value <= 0 {
        return Err(ApiError::InvalidId { parameter });
    }
    Ok(value)
}

/// Unwraps a JSON body, turning decoder rejections into [`ApiError::MalformedBody`].
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_ids() {
        assert_eq!(parse_id("id", "42").expect("valid"), 42);
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let err = parse_id("id", "abc").unwrap_err();
        assert!(matches!(
            err,
            ApiError::TypeMismatch { parameter: "id", ref value, expected: "i64" } if value == "abc"
        ));
    }

    #[test]
    fn rejects_zero_and_negative_ids() {
        for raw in ["0", "-5"] {
            let err = parse_id("id", raw).unwrap_err();
            assert!(matches!(err, ApiError::InvalidId { parameter: "id" }));
            assert_eq!(err.to_string(), "id must be a positive integer");
        }
    }
}
