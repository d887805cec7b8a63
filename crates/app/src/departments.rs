//! `/api/departments` handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use hr_records_core::{DepartmentDto, DepartmentPayload};

use crate::extract::{json_body, parse_id};
use crate::problem::ApiError;
use crate::router::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<DepartmentDto>>, ApiError> {
    let departments = state.departments().list_all().await?;
    Ok(Json(departments))
}

pub async fn get(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DepartmentDto>, ApiError> {
    let id = parse_id("id", &raw_id)?;
    let department = state.departments().get_by_id(id).await?;
    Ok(Json(department))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<DepartmentPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<DepartmentDto>), ApiError> {
    let draft = json_body(body)?.validate()?;
    let department = state.departments().create(draft).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<DepartmentPayload>, JsonRejection>,
) -> Result<Json<DepartmentDto>, ApiError> {
    let id = parse_id("id", &raw_id)?;
    let draft = json_body(body)?.validate()?;
    let department = state.departments().update(id, draft).await?;
    Ok(Json(department))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id("id", &raw_id)?;
    state.departments().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
