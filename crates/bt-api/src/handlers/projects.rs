//! Project API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use bt_db::projects::{CreateProject, UpdateProject};

use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentIdentity;
use crate::state::AppState;

/// GET /projects
pub async fn list(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let projects = state.projects.find_all().await?;
    Ok(Json(projects))
}

/// GET /projects/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let project = state
        .projects
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project"))?;
    Ok(Json(project))
}

/// GET /projects/creator/:id
pub async fn by_creator(
    State(state): State<AppState>,
    Path(creator_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let projects = state.projects.find_by_creator(creator_id).await?;
    Ok(Json(projects))
}

/// GET /projects/member/:id - membership join, not the creator column
pub async fn by_member(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let projects = state.members.find_projects_by_member(user_id).await?;
    Ok(Json(projects))
}

/// GET /projects/:id/members
pub async fn members(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let members = state.members.find_by_project(project_id).await?;
    Ok(Json(members))
}

/// POST /projects (admin); the creator is the authenticated caller
pub async fn create(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    Json(body): Json<CreateProjectRequest>,
) -> ApiResult<impl IntoResponse> {
    if body.project_name.trim().is_empty() {
        return Err(ApiError::bad_request("Project name is required"));
    }

    let project = state
        .projects
        .create(CreateProject {
            project_name: body.project_name,
            description: body.description,
            created_by: identity.user_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /projects/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProject>,
) -> ApiResult<impl IntoResponse> {
    let project = state
        .projects
        .update(id, body)
        .await?
        .ok_or_else(|| ApiError::not_found("Project"))?;
    Ok(Json(project))
}

/// DELETE /projects/:id (admin)
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    if !state.projects.delete(id).await? {
        return Err(ApiError::not_found("Project"));
    }
    Ok(Json(json!({ "message": "Project deleted successfully" })))
}

// Request types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub project_name: String,
    pub description: Option<String>,
}
