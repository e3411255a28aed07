//! Document reading operations.
//!
//! A document file may be in one of three states:
//!
//! - **Absent**: the file does not exist yet. Reading yields `T::default()`
//!   and does not create the file.
//! - **Blank**: zero bytes or whitespace only, as left by [`ensure_file`].
//!   Reading yields `T::default()`.
//! - **Populated**: must decode as `T`, otherwise [`Error::Corrupt`] is
//!   returned. Malformed content is never silently replaced by a default.
//!
//! [`ensure_file`]: crate::atomic::ensure_file

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::Path;

/// Reads and decodes the document stored at `path`.
///
/// # Errors
///
/// - [`Error::Io`] if the file exists but cannot be read
/// - [`Error::Corrupt`] if the file holds content that is not a valid `T`
///
/// # Examples
///
/// ```no_run
/// use chirpy_json::read_document;
/// use std::collections::BTreeMap;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let doc: BTreeMap<String, u32> = read_document("counts.json").await?;
/// println!("{} entries", doc.len());
/// # Ok(())
/// # }
/// ```
pub async fn read_document<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Document file absent, using default");
            return Ok(T::default());
        }
        Err(e) => return Err(Error::Io(e)),
    };

    decode_document(path, &bytes)
}

/// Decodes document bytes that were read from `path`.
///
/// The path is only used for error reporting.
///
/// # Errors
///
/// Returns [`Error::Corrupt`] if `bytes` is neither blank nor a valid `T`.
pub fn decode_document<T>(path: &Path, bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(bytes).map_err(|source| Error::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}
