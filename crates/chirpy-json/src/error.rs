//! Error types for chirpy-json operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for chirpy-json operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The value could not be serialized to JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file exists but does not hold a valid document.
    #[error("Corrupt document at {}: {source}", path.display())]
    Corrupt {
        /// The file that failed to decode.
        path: PathBuf,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

/// A specialized Result type for chirpy-json operations.
pub type Result<T> = std::result::Result<T, Error>;
