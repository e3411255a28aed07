//! Chirpy - core of a small social-posting service.
//!
//! This crate provides the JSON-file datastore for chirps, users and token
//! revocations, along with credential handling, chirp moderation and the
//! service configuration. The HTTP surface lives in `chirpy-server`.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod moderation;
pub mod store;

pub use error::{Error, Result};
pub use store::Store;
