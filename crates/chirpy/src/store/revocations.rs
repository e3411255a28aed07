//! Revoked refresh tokens.

use super::Store;
use crate::domain::Revocation;
use crate::error::Result;
use chrono::Utc;

impl Store {
    /// Records `token` as revoked as of now.
    ///
    /// Revoking the same token twice appends a second entry; lookups only
    /// care whether any entry matches.
    ///
    /// # Errors
    ///
    /// Returns a load or save error; on failure nothing is persisted.
    pub async fn record_revocation(&self, token: &str) -> Result<Revocation> {
        let revocation = self
            .transact(|doc| {
                let key = doc
                    .revocations
                    .last_key_value()
                    .map_or(0, |(key, _)| key + 1);
                let revocation = Revocation {
                    token: token.to_string(),
                    revoked_at: Utc::now(),
                };
                doc.revocations.insert(key, revocation.clone());
                Ok(revocation)
            })
            .await?;

        tracing::info!("Recorded token revocation");
        Ok(revocation)
    }

    /// Lists every recorded revocation in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a load error if the backing file cannot be read.
    pub async fn list_revocations(&self) -> Result<Vec<Revocation>> {
        self.read(|doc| Ok(doc.revocations.values().cloned().collect()))
            .await
    }

    /// Returns `true` if `token` has been revoked.
    ///
    /// # Errors
    ///
    /// Returns a load error if the backing file cannot be read.
    pub async fn is_revoked(&self, token: &str) -> Result<bool> {
        self.read(|doc| Ok(doc.is_revoked(token))).await
    }
}
