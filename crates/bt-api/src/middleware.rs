//! Authentication and role-check middleware
//!
//! `authenticate` verifies the bearer token and attaches the decoded
//! [`Identity`] to the request; `require_role` gates a route on that
//! identity's role. Both short-circuit before any handler runs.

use std::future::Future;
use std::pin::Pin;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use bt_auth::{extract_bearer_token, Identity};

use crate::error::ApiError;
use crate::state::AppState;

/// Verify the bearer token and attach the identity to the request.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            ApiError::unauthorized("Authorization header missing or invalid")
        })?;

    let token = extract_bearer_token(header_value).ok_or_else(|| {
        ApiError::unauthorized("Authorization header missing or invalid")
    })?;

    let identity = state
        .jwt
        .verify(token)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Middleware factory gating a route on a required role.
///
/// Expects `authenticate` to have run upstream; a request with no attached
/// identity is rejected as unauthenticated, a role mismatch as forbidden.
/// Role comparison is case-insensitive.
pub fn require_role(
    role: &'static str,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Result<Response, ApiError>> + Send>>
       + Clone
       + Send
       + Sync
       + 'static {
    move |request: Request, next: Next| {
        Box::pin(async move {
            let identity = request
                .extensions()
                .get::<Identity>()
                .ok_or_else(|| ApiError::unauthorized("User not authenticated"))?;

            if !identity.has_role(role) {
                return Err(ApiError::forbidden(
                    "Forbidden: You do not have access to this resource",
                ));
            }

            Ok(next.run(request).await)
        })
    }
}

/// Extractor for the identity attached by [`authenticate`]
pub struct CurrentIdentity(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or_else(|| ApiError::unauthorized("User not authenticated"))
    }
}

impl std::ops::Deref for CurrentIdentity {
    type Target = Identity;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
