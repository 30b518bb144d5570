//! User API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use bt_db::users::UpdateUser;
use bt_services::users::RegisterParams;

use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentIdentity;
use crate::state::AppState;

/// POST /users/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    if body.username.trim().is_empty() || body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request(
            "Username, email and password are required",
        ));
    }

    let user = state
        .users
        .register(RegisterParams {
            username: body.username,
            email: body.email,
            password: body.password,
            role: body.role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /users/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let (token, user) = state.users.login(&body.email, &body.password).await?;

    Ok(Json(json!({ "token": token, "user": user })))
}

/// GET /users/profile
pub async fn profile(
    State(state): State<AppState>,
    identity: CurrentIdentity,
) -> ApiResult<impl IntoResponse> {
    let user = state.users.profile(identity.user_id).await?;
    Ok(Json(user))
}

/// PUT /users/profile - the caller updates their own row
pub async fn update_profile(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    Json(body): Json<UpdateUser>,
) -> ApiResult<impl IntoResponse> {
    let user = state.users.update_profile(identity.user_id, body).await?;
    Ok(Json(user))
}

/// PUT /users/change-password
pub async fn change_password(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    Json(body): Json<ChangePasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    if body.new_password.is_empty() {
        return Err(ApiError::bad_request("New password is required"));
    }

    state
        .users
        .change_password(identity.user_id, &body.current_password, &body.new_password)
        .await?;

    Ok(Json(json!({ "message": "Password updated successfully" })))
}

/// GET /users (admin)
pub async fn list(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = state.users.list().await?;
    Ok(Json(users))
}

/// DELETE /users/:id (admin)
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    if !state.users.delete(id).await? {
        return Err(ApiError::not_found("User"));
    }
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

/// POST /users/resend-verification
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(body): Json<EmailRequest>,
) -> ApiResult<impl IntoResponse> {
    if body.email.trim().is_empty() {
        return Err(ApiError::bad_request("Email is required"));
    }

    state.verification.resend(&body.email).await?;
    Ok(Json(json!({ "message": "Verification code sent" })))
}

/// POST /users/verify-email
pub async fn verify_email(
    State(state): State<AppState>,
    Json(body): Json<VerifyEmailRequest>,
) -> ApiResult<impl IntoResponse> {
    if !state.verification.verify(&body.email, &body.code).await? {
        return Err(ApiError::bad_request(
            "Invalid or expired verification code",
        ));
    }
    Ok(Json(json!({ "message": "Email verified successfully" })))
}

// Request types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    pub email: String,
    pub code: String,
}
