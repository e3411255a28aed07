//! Shared application state.
//!
//! [`AppState`] is built once in `main` from the loaded configuration and
//! secrets, then cloned into every handler. Nothing in it is global.

use chirpy::Store;
use chirpy::auth::TokenIssuer;
use chirpy::config::{ChirpyConfig, Secrets};
use chirpy::moderation::ChirpFilter;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use subtle::ConstantTimeEq;

/// State shared by all handlers.
///
/// Cloning is cheap: every field is a handle or an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Datastore handle
    pub store: Store,
    /// Signs and verifies bearer tokens
    pub issuer: Arc<TokenIssuer>,
    /// Chirp length check and word masking
    pub filter: Arc<ChirpFilter>,
    /// Expected webhook key
    polka_key: Arc<str>,
    /// Requests served by the static file server since the last reset
    hits: Arc<AtomicU64>,
    /// Effective configuration
    pub config: Arc<ChirpyConfig>,
}

impl AppState {
    /// Opens the datastore named in `config` and assembles the state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file cannot be created or resolved.
    pub async fn new(config: ChirpyConfig, secrets: &Secrets) -> chirpy::Result<Self> {
        let store = Store::open(&config.database_file).await?;
        Ok(Self {
            store,
            issuer: Arc::new(config.token_issuer(secrets)),
            filter: Arc::new(config.chirp_filter()),
            polka_key: Arc::from(secrets.polka_key.as_str()),
            hits: Arc::new(AtomicU64::new(0)),
            config: Arc::new(config),
        })
    }

    /// Returns `true` if `key` is the configured webhook key. The bytes are
    /// compared in constant time.
    #[must_use]
    pub fn polka_key_matches(&self, key: &str) -> bool {
        self.polka_key.as_bytes().ct_eq(key.as_bytes()).into()
    }

    /// Counts one static file request.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Static file requests since start-up or the last reset.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Zeroes the hit counter.
    pub fn reset_hits(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("filter", &self.filter)
            .field("hits", &self.hits())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
