//! HTTP handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod chirps;
pub mod users;
pub mod webhooks;
