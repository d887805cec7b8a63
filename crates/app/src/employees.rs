//! `/api/employees` handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use hr_records_core::{EmployeeDto, EmployeePayload};

use crate::extract::{json_body, parse_id};
use crate::problem::ApiError;
use crate::router::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<EmployeeDto>>, ApiError> {
    let employees = state.employees().list_all().await?;
    Ok(Json(employees))
}

pub async fn get(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<EmployeeDto>, ApiError> {
    let id = parse_id("id", &raw_id)?;
    let employee = state.employees().get_by_id(id).await?;
    Ok(Json(employee))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<EmployeePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<EmployeeDto>), ApiError> {
    let draft = json_body(body)?.validate()?;
    let employee = state.employees().create(draft).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<EmployeePayload>, JsonRejection>,
) -> Result<Json<EmployeeDto>, ApiError> {
    let id = parse_id("id", &raw_id)?;
    let draft = json_body(body)?.validate()?;
    let employee = state.employees().update(id, draft).await?;
    Ok(Json(employee))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id("id", &raw_id)?;
    state.employees().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
