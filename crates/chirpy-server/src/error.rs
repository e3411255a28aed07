//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the error type of every handler. Its response body is
//! always `{"error": "<message>"}`. Server-side failures are logged in full
//! and reported to the client with a generic message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Errors returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request or rejected input (400).
    #[error("{0}")]
    BadRequest(String),

    /// Missing, invalid, expired or revoked credentials (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (403).
    #[error("{0}")]
    Forbidden(String),

    /// The addressed record does not exist (404).
    #[error("{0}")]
    NotFound(String),

    /// The request conflicts with existing data (409).
    #[error("{0}")]
    Conflict(String),

    /// Anything the client cannot fix (500).
    #[error("Internal error: {0}")]
    Internal(#[source] chirpy::Error),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    /// HTTP status code for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Shorthand for the 401 every failed credential check returns.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::Unauthorized("Unauthorized".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(source) => {
                tracing::error!(error = %source, "Request failed");
                "Something went wrong".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error: &message })).into_response()
    }
}

impl From<chirpy::Error> for ApiError {
    fn from(err: chirpy::Error) -> Self {
        use chirpy::Error;
        match err {
            Error::ChirpNotFound(_) => Self::NotFound("Chirp not found".to_string()),
            Error::UserNotFound(_) => Self::NotFound("User not found".to_string()),
            // Login treats an unknown email like a wrong password
            Error::EmailNotFound(_) | Error::Token(_) => Self::unauthorized(),
            Error::EmailTaken(_) => Self::Conflict(err.to_string()),
            Error::Forbidden { .. } => Self::Forbidden("Forbidden".to_string()),
            Error::ChirpTooLong { .. } => Self::BadRequest("Chirp is too long".to_string()),
            Error::CorruptStore { .. }
            | Error::Io(_)
            | Error::Serialization(_)
            | Error::Hashing(_)
            | Error::Config(_) => Self::Internal(err),
        }
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chirpy::domain::{ChirpId, UserId};
    use rstest::rstest;

    #[rstest]
    #[case::chirp_missing(chirpy::Error::ChirpNotFound(ChirpId(1)), StatusCode::NOT_FOUND)]
    #[case::user_missing(chirpy::Error::UserNotFound(UserId(1)), StatusCode::NOT_FOUND)]
    #[case::email_missing(chirpy::Error::EmailNotFound("a@b.c".into()), StatusCode::UNAUTHORIZED)]
    #[case::email_taken(chirpy::Error::EmailTaken("a@b.c".into()), StatusCode::CONFLICT)]
    #[case::not_owner(
        chirpy::Error::Forbidden { chirp_id: ChirpId(1), requester: UserId(2) },
        StatusCode::FORBIDDEN
    )]
    #[case::too_long(chirpy::Error::ChirpTooLong { length: 141, max: 140 }, StatusCode::BAD_REQUEST)]
    #[case::hashing(chirpy::Error::Hashing("boom".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn core_errors_map_to_status(#[case] err: chirpy::Error, #[case] expected: StatusCode) {
        assert_eq!(ApiError::from(err).status(), expected);
    }

    #[tokio::test]
    async fn internal_error_hides_details() {
        let err = ApiError::from(chirpy::Error::Config("secret path".into()));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Something went wrong");
    }
}
