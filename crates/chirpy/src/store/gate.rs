//! Process-wide reader/writer locks keyed by backing file.
//!
//! Handlers may open a fresh [`Store`](super::Store) per request. Every handle
//! for the same canonical path receives a clone of the same lock, so mutual
//! exclusion holds across handles and not just within one.
//!
//! Entries are never evicted. A process only ever touches a handful of
//! backing files, and dropping a lock another handle still references would
//! split the gate in two.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tokio::sync::RwLock;

/// Shared lock guarding one backing file.
pub(crate) type Gate = Arc<RwLock<()>>;

static REGISTRY: OnceLock<Mutex<HashMap<PathBuf, Gate>>> = OnceLock::new();

/// Returns the gate for `canonical_path`, creating it on first use.
///
/// The caller must pass a canonicalized path; two spellings of one file
/// would otherwise get different gates.
pub(crate) fn gate_for(canonical_path: &Path) -> Gate {
    let registry = REGISTRY.get_or_init(|| Mutex::new(HashMap::new()));
    // The map is only mutated by `entry().or_default()`, which cannot leave it
    // half-updated, so a poisoned guard is still consistent.
    let mut gates = registry.lock().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(gates.entry(canonical_path.to_path_buf()).or_default())
}
