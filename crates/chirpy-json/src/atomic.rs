//! Atomic write operations for document files.
//!
//! This module replaces a document file's entire contents in a crash-safe way
//! using the temp-file-then-rename pattern.
//!
//! # Atomicity Guarantee
//!
//! On POSIX systems, renames within one filesystem are atomic. A write goes
//! through these steps:
//!
//! 1. The value is serialized in memory (nothing touches disk on failure)
//! 2. The bytes are written to a sibling file with a `.tmp` suffix
//! 3. The temporary file is flushed and synced to disk
//! 4. The temporary file is renamed over the target path
//!
//! A crash before step 4 leaves the original file intact. Readers only ever
//! observe the old document or the new one.
//!
//! # Examples
//!
//! ```no_run
//! use chirpy_json::write_document_atomic;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Settings {
//!     name: String,
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings { name: "chirpy".to_string() };
//! write_document_atomic("settings.json", &settings).await?;
//! # Ok(())
//! # }
//! ```

use crate::Result;
use serde::Serialize;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Atomically replaces the file at `path` with the JSON encoding of `value`.
///
/// # Errors
///
/// Returns an error if:
/// - The value fails to serialize
/// - The temporary file cannot be created or written
/// - The rename fails (e.g., cross-filesystem move)
///
/// On failure the original file is left unchanged and the temporary file is
/// removed on a best-effort basis.
pub async fn write_document_atomic<T, P>(path: P, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = serde_json::to_vec(value)?;
    let temp_path = temp_path_for(path);

    if let Err(e) = write_and_sync(&temp_path, &bytes).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e.into());
    }

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Document written");
    Ok(())
}

/// Creates an empty file at `path` if nothing exists there yet.
///
/// Missing parent directories are created. An existing file is never
/// truncated, so calling this repeatedly is safe.
///
/// Returns `true` if the file was created by this call.
///
/// # Errors
///
/// Returns an error if the directories or the file cannot be created.
pub async fn ensure_file<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    match OpenOptions::new().write(true).create_new(true).open(path).await {
        Ok(_) => {
            tracing::info!(path = %path.display(), "Created empty document file");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Returns the sibling temp path used while replacing `path`.
///
/// `.tmp` is appended to the full file name, so `db.json` becomes
/// `db.json.tmp` and `db` becomes `db.tmp`.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, OsString::from);
    name.push(".tmp");
    path.with_file_name(name)
}

async fn write_and_sync(temp_path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(temp_path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestRecord {
        id: u32,
        name: String,
    }

    #[rstest]
    #[case::with_extension("/path/to/db.json", "/path/to/db.json.tmp")]
    #[case::without_extension("/path/to/db", "/path/to/db.tmp")]
    #[case::multiple_extensions("/path/to/db.tar.gz", "/path/to/db.tar.gz.tmp")]
    #[case::relative("db.json", "db.json.tmp")]
    fn temp_path_appends_suffix(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(temp_path_for(Path::new(input)), Path::new(expected));
    }

    #[tokio::test]
    async fn atomic_write_creates_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("db.json");

        let record = TestRecord {
            id: 1,
            name: "First".to_string(),
        };
        write_document_atomic(&target, &record).await.unwrap();

        let contents = tokio::fs::read_to_string(&target).await.unwrap();
        assert_eq!(contents, r#"{"id":1,"name":"First"}"#);
    }

    #[tokio::test]
    async fn atomic_write_replaces_entire_contents() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("db.json");
        tokio::fs::write(&target, "old content that is much longer than the new one")
            .await
            .unwrap();

        let record = TestRecord {
            id: 42,
            name: "New".to_string(),
        };
        write_document_atomic(&target, &record).await.unwrap();

        let contents = tokio::fs::read_to_string(&target).await.unwrap();
        assert_eq!(contents, r#"{"id":42,"name":"New"}"#);
    }

    #[tokio::test]
    async fn atomic_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("db.json");

        write_document_atomic(&target, &vec![1, 2, 3]).await.unwrap();

        assert!(target.exists());
        assert!(!dir.path().join("db.json.tmp").exists());
    }

    #[tokio::test]
    async fn atomic_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing-dir").join("db.json");

        let result = write_document_atomic(&target, &vec![1]).await;

        assert!(result.is_err());
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn ensure_file_creates_empty_file_and_parents() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested").join("db.json");

        let created = ensure_file(&target).await.unwrap();

        assert!(created);
        let metadata = tokio::fs::metadata(&target).await.unwrap();
        assert_eq!(metadata.len(), 0);
    }

    #[tokio::test]
    async fn ensure_file_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("db.json");
        tokio::fs::write(&target, r#"{"id":7}"#).await.unwrap();

        let created = ensure_file(&target).await.unwrap();

        assert!(!created);
        let contents = tokio::fs::read_to_string(&target).await.unwrap();
        assert_eq!(contents, r#"{"id":7}"#);
    }
}
