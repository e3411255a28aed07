//! Chirp handlers.

use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiQuery, AuthUser};
use crate::models::{
    ChirpRequest, ChirpResponse, ListChirpsQuery, SortOrder, ValidateChirpResponse,
};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chirpy::domain::{ChirpId, UserId};

/// `POST /api/validate_chirp`
pub async fn validate_chirp(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ChirpRequest>,
) -> Result<Json<ValidateChirpResponse>> {
    let cleaned_body = state.filter.moderate(&req.body)?;
    Ok(Json(ValidateChirpResponse { cleaned_body }))
}

/// `POST /api/chirps`
///
/// The unfiltered body is stored; the response shows it masked.
pub async fn create_chirp(
    State(state): State<AppState>,
    AuthUser(author): AuthUser,
    ApiJson(req): ApiJson<ChirpRequest>,
) -> Result<(StatusCode, Json<ChirpResponse>)> {
    state.filter.check_length(&req.body)?;
    let chirp = state.store.create_chirp(req.body, author).await?;
    Ok((
        StatusCode::CREATED,
        Json(ChirpResponse::render(chirp, &state.filter)),
    ))
}

/// `GET /api/chirps?author_id=&sort=asc|desc`
pub async fn list_chirps(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListChirpsQuery>,
) -> Result<Json<Vec<ChirpResponse>>> {
    let mut chirps = state.store.list_chirps(query.author_id.map(UserId)).await?;
    if query.sort == SortOrder::Desc {
        chirps.reverse();
    }
    Ok(Json(
        chirps
            .into_iter()
            .map(|chirp| ChirpResponse::render(chirp, &state.filter))
            .collect(),
    ))
}

/// `GET /api/chirps/{chirp_id}`
pub async fn get_chirp(
    State(state): State<AppState>,
    Path(chirp_id): Path<String>,
) -> Result<Json<ChirpResponse>> {
    let chirp = state.store.get_chirp(parse_chirp_id(&chirp_id)?).await?;
    Ok(Json(ChirpResponse::render(chirp, &state.filter)))
}

/// `DELETE /api/chirps/{chirp_id}`
pub async fn delete_chirp(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(chirp_id): Path<String>,
) -> Result<StatusCode> {
    state
        .store
        .delete_chirp(parse_chirp_id(&chirp_id)?, requester)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_chirp_id(raw: &str) -> Result<ChirpId> {
    raw.parse::<u64>()
        .map(ChirpId)
        .map_err(|_| ApiError::BadRequest(format!("Invalid chirp id '{raw}'")))
}
