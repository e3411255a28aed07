//! Account handlers.

use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, AuthUser};
use crate::models::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

/// `POST /api/users`
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    require_credentials(&req.email, Some(req.password.as_str()))?;
    let user = state.store.create_user(&req.email, &req.password).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `PUT /api/users`
///
/// Updates the caller's own account. The upgrade flag is left alone.
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    require_credentials(&req.email, req.password.as_deref())?;
    let user = state
        .store
        .update_credentials(user_id, &req.email, req.password.as_deref())
        .await?;
    Ok(Json(user.into()))
}

fn require_credentials(email: &str, password: Option<&str>) -> Result<()> {
    if email.trim().is_empty() {
        return Err(ApiError::BadRequest("Email is required".to_string()));
    }
    if password.is_some_and(str::is_empty) {
        return Err(ApiError::BadRequest("Password cannot be empty".to_string()));
    }
    Ok(())
}
