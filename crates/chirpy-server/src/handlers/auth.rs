//! Login and token lifecycle handlers.

use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, RefreshToken};
use crate::models::{LoginRequest, LoginResponse, TokenResponse};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chirpy::auth::{TokenKind, verify_password};
use chrono::Duration;

/// `POST /api/login`
///
/// An unknown email and a wrong password both answer 401.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user = state.store.find_user_by_email(&req.email).await?;
    if !verify_password(&req.password, &user.password_hash).await? {
        tracing::info!(user_id = %user.id, "Login with wrong password");
        return Err(ApiError::unauthorized());
    }

    let ttl = access_ttl(req.expires_in_seconds, state.issuer.access_ttl());
    let token = state.issuer.issue_with_ttl(user.id, TokenKind::Access, ttl)?;
    let refresh_token = state.issuer.issue(user.id, TokenKind::Refresh)?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(LoginResponse {
        user: user.into(),
        token,
        refresh_token,
    }))
}

/// `POST /api/refresh`
pub async fn refresh(
    State(state): State<AppState>,
    refresh: RefreshToken,
) -> Result<Json<TokenResponse>> {
    let token = state.issuer.issue(refresh.user, TokenKind::Access)?;
    Ok(Json(TokenResponse { token }))
}

/// `POST /api/revoke`
pub async fn revoke(
    State(state): State<AppState>,
    refresh: RefreshToken,
) -> Result<StatusCode> {
    state.store.record_revocation(&refresh.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lifetime for a login's access token: the requested seconds when positive
/// and below `default`, otherwise `default`.
fn access_ttl(requested_secs: Option<i64>, default: Duration) -> Duration {
    requested_secs
        .filter(|secs| *secs > 0)
        .and_then(Duration::try_seconds)
        .map_or(default, |requested| requested.min(default))
}
