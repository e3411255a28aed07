//! Single-document JSON persistence.
//!
//! This library stores one serializable value per file. Reads treat a missing
//! or blank file as the value's default, and reject malformed content loudly.
//! Writes replace the whole file atomically using the temp-file-then-rename
//! pattern, so a crash mid-write never leaves a half-written document behind.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod error;
pub mod reader;

pub use atomic::{ensure_file, write_document_atomic};
pub use error::{Error, Result};
pub use reader::{decode_document, read_document};
