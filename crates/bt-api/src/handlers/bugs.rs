//! Bug API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use bt_db::bugs::{CreateBug, UpdateBug};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /bugs (admin) - includes derived comment counts
pub async fn list(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let bugs = state.bugs.find_all().await?;
    Ok(Json(bugs))
}

/// GET /bugs/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let bug = state
        .bugs
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Bug"))?;
    Ok(Json(bug))
}

/// GET /bugs/project/:id
pub async fn by_project(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let bugs = state.bugs.find_by_project(project_id).await?;
    Ok(Json(bugs))
}

/// GET /bugs/assignee/:id
pub async fn by_assignee(
    State(state): State<AppState>,
    Path(assignee_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let bugs = state.bugs.find_by_assignee(assignee_id).await?;
    Ok(Json(bugs))
}

/// GET /bugs/reporter/:id
pub async fn by_reporter(
    State(state): State<AppState>,
    Path(reporter_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let bugs = state.bugs.find_by_reporter(reporter_id).await?;
    Ok(Json(bugs))
}

/// GET /bugs/status/:status
pub async fn by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let bugs = state.bugs.find_by_status(&status).await?;
    Ok(Json(bugs))
}

/// POST /bugs
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateBug>,
) -> ApiResult<impl IntoResponse> {
    if body.title.trim().is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }

    // a nonexistent project surfaces as a foreign-key violation, mapped
    // to a generic 500 like any other constraint failure
    let bug = state.bugs.create(body).await?;
    Ok((StatusCode::CREATED, Json(bug)))
}

/// PUT /bugs/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateBug>,
) -> ApiResult<impl IntoResponse> {
    let bug = state
        .bugs
        .update(id, body)
        .await?
        .ok_or_else(|| ApiError::not_found("Bug"))?;
    Ok(Json(bug))
}

/// DELETE /bugs/:id (admin)
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    if !state.bugs.delete(id).await? {
        return Err(ApiError::not_found("Bug"));
    }
    Ok(Json(json!({ "message": "Bug deleted successfully" })))
}
