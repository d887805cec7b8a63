//! Translation of every handler failure into an HTTP response.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use hr_records_core::ValidationErrors;

use crate::services::ServiceError;

#[derive(Debug, Serialize)]
struct ProblemDetails {
    #[serde(rename = "type")]
    problem_type: &'static str,
    title: &'static str,
    detail: String,
}

pub struct ProblemResponse {
    status: StatusCode,
    body: ProblemDetails,
}

impl ProblemResponse {
    pub fn new<S: Into<String>>(status: StatusCode, problem_type: &'static str, detail: S) -> Self {
        Self {
            status,
            body: ProblemDetails {
                problem_type,
                title: status.canonical_reason().unwrap_or("error"),
                detail: detail.into(),
            },
        }
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let mut response = Json(self.body).into_response();
        *response.status_mut() = self.status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

/// Every failure a request handler can report.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(
        "Failed to convert value '{value}' to required type '{expected}' \
         for parameter '{parameter}'."
    )]
    TypeMismatch {
        parameter: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("{parameter} must be a positive integer")]
    InvalidId { parameter: &'static str },
    #[error("{0}")]
    MalformedBody(String),
    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn problem_type(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::InvalidId { .. } => "invalid_id",
            Self::MalformedBody(_) => "malformed_body",
            Self::Unexpected(_) => "unexpected_error",
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::NotFound { .. } => Self::NotFound(message),
            ServiceError::Duplicate { .. } | ServiceError::DepartmentInUse { .. } => {
                Self::Conflict(message)
            }
            ServiceError::DepartmentStore(_) | ServiceError::EmployeeStore(_) => {
                Self::Unexpected(message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let problem_type = self.problem_type();
        match &self {
            Self::Unexpected(detail) => {
                error!(stage = "http", problem = problem_type, %detail, "request failed");
            }
            other => {
                warn!(stage = "http", problem = problem_type, detail = %other, "request rejected");
            }
        }

        match self {
            Self::Validation(errors) => (status, Json(errors)).into_response(),
            other => ProblemResponse::new(status, problem_type, other.to_string()).into_response(),
        }
    }
}
