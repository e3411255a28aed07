//! Payment provider webhooks.

use crate::error::Result;
use crate::extract::{ApiJson, PolkaKey};
use crate::models::WebhookRequest;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use chirpy::domain::UserId;

/// Event that upgrades a user.
pub const USER_UPGRADED: &str = "user.upgraded";

/// `POST /api/polka/webhooks`
///
/// Events other than [`USER_UPGRADED`] are acknowledged and ignored.
pub async fn polka(
    State(state): State<AppState>,
    _key: PolkaKey,
    ApiJson(req): ApiJson<WebhookRequest>,
) -> Result<StatusCode> {
    if req.event != USER_UPGRADED {
        tracing::debug!(event = %req.event, "Ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    state.store.upgrade_user(UserId(req.data.user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
