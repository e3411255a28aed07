//! Request and response bodies for the HTTP API.

use chirpy::domain::{Chirp, User};
use chirpy::moderation::ChirpFilter;
use serde::{Deserialize, Serialize};

/// Body of chirp create and validate requests.
#[derive(Debug, Deserialize)]
pub struct ChirpRequest {
    /// Text of the chirp
    pub body: String,
}

/// Response of `POST /api/validate_chirp`.
#[derive(Debug, Serialize)]
pub struct ValidateChirpResponse {
    /// Body with banned words masked
    pub cleaned_body: String,
}

/// A chirp as shown to clients, with banned words masked.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChirpResponse {
    /// Chirp id
    pub id: u64,
    /// Filtered body
    pub body: String,
    /// Author's user id
    pub author_id: u64,
}

impl ChirpResponse {
    /// Renders a stored chirp through `filter`.
    #[must_use]
    pub fn render(chirp: Chirp, filter: &ChirpFilter) -> Self {
        Self {
            id: chirp.id.0,
            body: filter.clean(&chirp.body),
            author_id: chirp.author_id.0,
        }
    }
}

/// Sort direction for chirp listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first
    #[default]
    Asc,
    /// Newest first
    Desc,
}

/// Query string of `GET /api/chirps`.
#[derive(Debug, Default, Deserialize)]
pub struct ListChirpsQuery {
    /// Only chirps by this user
    pub author_id: Option<u64>,
    /// Order by id
    #[serde(default)]
    pub sort: SortOrder,
}

/// Body of `POST /api/users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Login email
    pub email: String,
    /// Plaintext password
    pub password: String,
}

/// Body of `PUT /api/users`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// New login email
    pub email: String,
    /// New password; the current one is kept when absent
    #[serde(default)]
    pub password: Option<String>,
}

/// Body of `POST /api/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Plaintext password
    pub password: String,
    /// Requested access token lifetime, capped at the configured default
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

/// A user as shown to clients. Never includes the password hash.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    /// User id
    pub id: u64,
    /// Login email
    pub email: String,
    /// Whether the account has been upgraded
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.0,
            email: user.email,
            is_chirpy_red: user.is_upgraded,
        }
    }
}

/// Response of `POST /api/login`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// The authenticated user
    #[serde(flatten)]
    pub user: UserResponse,
    /// Access token
    pub token: String,
    /// Refresh token
    pub refresh_token: String,
}

/// Response of `POST /api/refresh`.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Fresh access token
    pub token: String,
}

/// Event delivered by the payment provider.
#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    /// Event name, e.g. `user.upgraded`
    pub event: String,
    /// Event payload
    pub data: WebhookData,
}

/// Payload of a webhook event.
#[derive(Debug, Deserialize)]
pub struct WebhookData {
    /// The user the event is about
    pub user_id: u64,
}
