//! Error types for chirpy operations.

use crate::domain::{ChirpId, UserId};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for chirpy operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No chirp with the given id exists.
    #[error("Chirp not found: {0}")]
    ChirpNotFound(ChirpId),

    /// No user with the given id exists.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// No user is registered under the given email.
    #[error("No user registered with email {0}")]
    EmailNotFound(String),

    /// A user with this email already exists.
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// The chirp does not exist or belongs to someone else.
    #[error("Chirp {chirp_id} cannot be deleted by user {requester}")]
    Forbidden {
        /// The chirp the requester tried to delete.
        chirp_id: ChirpId,
        /// The user who asked for the deletion.
        requester: UserId,
    },

    /// A chirp body exceeds the configured maximum length.
    #[error("Chirp is too long: {length} characters (max {max})")]
    ChirpTooLong {
        /// Length of the rejected body in characters.
        length: usize,
        /// The configured limit.
        max: usize,
    },

    /// The backing file exists but does not hold a valid document.
    #[error("Corrupt store at {}: {source}", path.display())]
    CorruptStore {
        /// Path of the backing file.
        path: PathBuf,
        /// The decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The document could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Password hashing or verification failed internally.
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// A bearer token could not be issued or failed validation.
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` for lookup misses of any record kind.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ChirpNotFound(_) | Self::UserNotFound(_) | Self::EmailNotFound(_)
        )
    }
}

impl From<chirpy_json::Error> for Error {
    fn from(err: chirpy_json::Error) -> Self {
        match err {
            chirpy_json::Error::Io(e) => Self::Io(e),
            chirpy_json::Error::Json(e) => Self::Serialization(e),
            chirpy_json::Error::Corrupt { path, source } => Self::CorruptStore { path, source },
        }
    }
}

/// A specialized Result type for chirpy operations.
pub type Result<T> = std::result::Result<T, Error>;
