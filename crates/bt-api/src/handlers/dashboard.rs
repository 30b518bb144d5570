//! Dashboard API handler

use axum::{extract::State, response::IntoResponse, Json};

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /dashboard (admin) - concurrent fan-out over users, projects, bugs
pub async fn get(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let data = state.dashboard.load().await?;
    Ok(Json(data))
}
