//! Request extractors.
//!
//! The JSON and query wrappers reject with [`ApiError`] so malformed input
//! gets the same `{"error": ...}` body as every other failure. The credential
//! extractors read the `Authorization` header.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use chirpy::auth::TokenKind;
use chirpy::domain::UserId;

/// JSON body extractor that rejects with [`ApiError::BadRequest`].
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string extractor that rejects with [`ApiError::BadRequest`].
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// The user named by a valid access token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub UserId);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = credential(&parts.headers, "Bearer")?;
        let user = state.issuer.verify(token, TokenKind::Access).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            ApiError::unauthorized()
        })?;
        Ok(Self(user))
    }
}

/// A valid, unrevoked refresh token and the user it belongs to.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    /// The token's subject
    pub user: UserId,
    /// The raw token string
    pub token: String,
}

impl FromRequestParts<AppState> for RefreshToken {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = credential(&parts.headers, "Bearer")?;
        let user = state.issuer.verify(token, TokenKind::Refresh).map_err(|e| {
            tracing::debug!(error = %e, "Rejected refresh token");
            ApiError::unauthorized()
        })?;
        if state.store.is_revoked(token).await? {
            tracing::debug!(user_id = %user, "Refresh token was revoked");
            return Err(ApiError::unauthorized());
        }
        Ok(Self {
            user,
            token: token.to_string(),
        })
    }
}

/// Proof that the request carries the payment provider's API key.
#[derive(Debug, Clone, Copy)]
pub struct PolkaKey;

impl FromRequestParts<AppState> for PolkaKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = credential(&parts.headers, "ApiKey")?;
        if !state.polka_key_matches(key) {
            tracing::warn!("Webhook presented a wrong API key");
            return Err(ApiError::unauthorized());
        }
        Ok(Self)
    }
}

/// Returns the credential following `scheme` in the `Authorization` header.
fn credential<'a>(headers: &'a HeaderMap, scheme: &str) -> Result<&'a str, ApiError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split_once(' '))
        .filter(|(found, _)| found.eq_ignore_ascii_case(scheme))
        .map(|(_, credential)| credential.trim())
        .filter(|credential| !credential.is_empty())
        .ok_or_else(ApiError::unauthorized)
}
