//! JSON-file datastore for chirps, users and token revocations.
//!
//! A [`Store`] is a cheap handle onto one backing file holding a whole
//! [`Document`]. There is no cache: every operation reads the file, and every
//! mutating operation writes the complete document back.
//!
//! # Concurrency
//!
//! All handles for one file share a single reader/writer lock (see
//! [`gate`]). Read-only operations hold the shared lock while the file is read
//! and decoded. Mutating operations hold the exclusive lock across the entire
//! load → mutate → save sequence, so two concurrent creates can never observe
//! the same snapshot and hand out the same id.
//!
//! # Identifier Allocation
//!
//! A new record's id is `1 + max(existing ids)` in its collection, computed
//! from the snapshot loaded inside the exclusive section. New records are
//! stored under a key equal to their id, and deletion never renumbers the
//! remaining records.
//!
//! # Example
//!
//! ```no_run
//! use chirpy::domain::UserId;
//! use chirpy::store::Store;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> chirpy::error::Result<()> {
//!     let store = Store::open("database.json").await?;
//!     let chirp = store.create_chirp("hello", UserId(1)).await?;
//!     assert_eq!(store.get_chirp(chirp.id).await?.body, "hello");
//!     Ok(())
//! }
//! ```

mod chirps;
pub(crate) mod gate;
mod revocations;
mod users;

use crate::domain::Document;
use crate::error::Result;
use gate::Gate;
use std::path::{Path, PathBuf};

/// Handle onto a single-file datastore.
///
/// Cloning is cheap and clones share the same lock.
#[derive(Debug, Clone)]
pub struct Store {
    /// Canonical path of the backing file
    path: PathBuf,

    /// Lock shared by every handle on `path`
    gate: Gate,
}

impl Store {
    /// Opens the datastore at `path`, creating an empty backing file (and any
    /// missing parent directories) if none exists.
    ///
    /// Opening is idempotent: an existing file is never reset, and every
    /// handle opened on the same file shares one lock.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be created or its path cannot
    /// be resolved.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        init(path).await?;
        let path = tokio::fs::canonicalize(path).await?;
        let gate = gate::gate_for(&path);

        tracing::debug!(path = %path.display(), "Opened store");
        Ok(Self { path, gate })
    }

    /// Returns the canonical path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full document under the shared lock.
    ///
    /// A missing or blank file yields an empty document.
    ///
    /// # Errors
    ///
    /// - `Error::CorruptStore` if the file holds malformed content
    /// - `Error::Io` if the file cannot be read
    pub async fn load(&self) -> Result<Document> {
        let _guard = self.gate.read().await;
        self.load_unlocked().await
    }

    /// Replaces the full document under the exclusive lock.
    ///
    /// The write is atomic: concurrent readers and crash recovery observe
    /// either the previous document or `document`, never a mix.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` or `Error::Serialization` if the write fails.
    pub async fn save(&self, document: &Document) -> Result<()> {
        let _guard = self.gate.write().await;
        self.save_unlocked(document).await
    }

    /// Runs a read-only query against a snapshot taken under the shared lock.
    pub(crate) async fn read<T>(&self, query: impl FnOnce(&Document) -> Result<T>) -> Result<T> {
        let _guard = self.gate.read().await;
        let document = self.load_unlocked().await?;
        query(&document)
    }

    /// Runs `mutate` as one critical section under the exclusive lock.
    ///
    /// The document is saved only if `mutate` succeeds; on error the backing
    /// file is left untouched.
    pub(crate) async fn transact<T>(
        &self,
        mutate: impl FnOnce(&mut Document) -> Result<T>,
    ) -> Result<T> {
        let _guard = self.gate.write().await;
        let mut document = self.load_unlocked().await?;
        let output = mutate(&mut document)?;
        self.save_unlocked(&document).await?;
        Ok(output)
    }

    async fn load_unlocked(&self) -> Result<Document> {
        Ok(chirpy_json::read_document(&self.path).await?)
    }

    async fn save_unlocked(&self, document: &Document) -> Result<()> {
        Ok(chirpy_json::write_document_atomic(&self.path, document).await?)
    }
}

/// Creates an empty backing file at `path` if none exists.
///
/// Returns `true` if a file was created. An existing file is never truncated.
///
/// # Errors
///
/// Returns `Error::Io` if the file or its parent directories cannot be
/// created.
pub async fn init(path: impl AsRef<Path>) -> Result<bool> {
    Ok(chirpy_json::ensure_file(path).await?)
}

/// Returns `1 + max(ids)`, or 1 for an empty collection.
fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().map_or(1, |max| max + 1)
}
