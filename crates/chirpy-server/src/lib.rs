//! HTTP API server for chirpy.
//!
//! This crate exposes the chirpy datastore over a JSON API built on `axum`.
//!
//! # Routes
//!
//! ## Admin
//! - `GET /api/healthz` - Liveness check
//! - `GET /admin/metrics` - Static file hit count
//! - `POST /admin/reset` - Zero the hit count
//!
//! ## Chirps
//! - `POST /api/validate_chirp` - Length check and word masking only
//! - `GET|POST /api/chirps` - List or create
//! - `GET|DELETE /api/chirps/{chirp_id}` - Fetch or delete one
//!
//! ## Accounts
//! - `POST|PUT /api/users` - Register or update
//! - `POST /api/login` - Exchange credentials for tokens
//! - `POST /api/refresh` - Exchange a refresh token for an access token
//! - `POST /api/revoke` - Revoke a refresh token
//! - `POST /api/polka/webhooks` - Payment provider events

pub mod cli;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;

pub use error::{ApiError, Result};
pub use router::build_router;
pub use state::AppState;
