//! Chirp collection operations.

use super::{Store, next_id};
use crate::domain::{Chirp, ChirpId, UserId};
use crate::error::{Error, Result};

impl Store {
    /// Creates a chirp authored by `author_id` and returns it with its
    /// assigned id.
    ///
    /// The body is stored as given. Length checks and moderation belong to
    /// the caller.
    ///
    /// # Errors
    ///
    /// Returns a load or save error; on failure nothing is persisted.
    pub async fn create_chirp(&self, body: impl Into<String>, author_id: UserId) -> Result<Chirp> {
        let body = body.into();
        let chirp = self
            .transact(move |doc| {
                let id = ChirpId(next_id(doc.chirps.values().map(|c| c.id.0)));
                let chirp = Chirp {
                    id,
                    body,
                    author_id,
                };
                doc.chirps.insert(id.0, chirp.clone());
                Ok(chirp)
            })
            .await?;

        tracing::info!(chirp_id = %chirp.id, author_id = %author_id, "Created chirp");
        Ok(chirp)
    }

    /// Fetches a chirp by id.
    ///
    /// # Errors
    ///
    /// Returns `Error::ChirpNotFound` if no chirp has this id.
    pub async fn get_chirp(&self, id: ChirpId) -> Result<Chirp> {
        self.read(|doc| doc.chirp(id).cloned().ok_or(Error::ChirpNotFound(id)))
            .await
    }

    /// Lists chirps in ascending id order, optionally restricted to one
    /// author.
    ///
    /// # Errors
    ///
    /// Returns a load error if the backing file cannot be read.
    pub async fn list_chirps(&self, author: Option<UserId>) -> Result<Vec<Chirp>> {
        self.read(|doc| {
            let mut chirps: Vec<Chirp> = doc
                .chirps
                .values()
                .filter(|chirp| author.is_none_or(|a| chirp.author_id == a))
                .cloned()
                .collect();
            chirps.sort_by_key(|chirp| chirp.id);
            Ok(chirps)
        })
        .await
    }

    /// Deletes a chirp on behalf of `requester`.
    ///
    /// Only the author may delete a chirp. A missing chirp and someone else's
    /// chirp fail the same way, so callers cannot discover ids they do not
    /// own. Other chirps keep their ids and keys.
    ///
    /// # Errors
    ///
    /// Returns `Error::Forbidden` if no chirp with this id was written by
    /// `requester`.
    pub async fn delete_chirp(&self, id: ChirpId, requester: UserId) -> Result<()> {
        self.transact(|doc| {
            let key = doc
                .chirps
                .iter()
                .find(|(_, chirp)| chirp.id == id && chirp.author_id == requester)
                .map(|(key, _)| *key)
                .ok_or(Error::Forbidden {
                    chirp_id: id,
                    requester,
                })?;
            doc.chirps.remove(&key);
            Ok(())
        })
        .await?;

        tracing::info!(chirp_id = %id, requester = %requester, "Deleted chirp");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("database.json")).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn ids_start_at_one_and_increase() {
        let (_dir, store) = store().await;

        let a = store.create_chirp("a", UserId(1)).await.unwrap();
        let b = store.create_chirp("b", UserId(1)).await.unwrap();

        assert_eq!(a.id, ChirpId(1));
        assert_eq!(b.id, ChirpId(2));
    }

    #[tokio::test]
    async fn body_is_stored_unfiltered() {
        let (_dir, store) = store().await;

        let chirp = store.create_chirp("What a Kerfuffle", UserId(1)).await.unwrap();

        assert_eq!(store.get_chirp(chirp.id).await.unwrap().body, "What a Kerfuffle");
    }

    #[tokio::test]
    async fn get_missing_chirp_is_not_found() {
        let (_dir, store) = store().await;

        let err = store.get_chirp(ChirpId(42)).await.unwrap_err();
        assert!(matches!(err, Error::ChirpNotFound(ChirpId(42))));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn list_filters_by_author() {
        let (_dir, store) = store().await;
        store.create_chirp("one", UserId(1)).await.unwrap();
        store.create_chirp("two", UserId(2)).await.unwrap();
        store.create_chirp("three", UserId(1)).await.unwrap();

        let mine = store.list_chirps(Some(UserId(1))).await.unwrap();
        let bodies: Vec<_> = mine.iter().map(|c| c.body.as_str()).collect();
        assert_eq!(bodies, ["one", "three"]);

        assert_eq!(store.list_chirps(None).await.unwrap().len(), 3);
        assert!(store.list_chirps(Some(UserId(9))).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_by_other_user_is_forbidden() {
        let (_dir, store) = store().await;
        let chirp = store.create_chirp("mine", UserId(1)).await.unwrap();

        let err = store.delete_chirp(chirp.id, UserId(2)).await.unwrap_err();

        assert!(matches!(err, Error::Forbidden { .. }));
        assert!(store.get_chirp(chirp.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_missing_chirp_is_forbidden() {
        let (_dir, store) = store().await;

        let err = store.delete_chirp(ChirpId(5), UserId(1)).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden { .. }));
    }

    #[tokio::test]
    async fn delete_leaves_other_ids_alone() {
        let (_dir, store) = store().await;
        for body in ["a", "b", "c"] {
            store.create_chirp(body, UserId(1)).await.unwrap();
        }

        store.delete_chirp(ChirpId(2), UserId(1)).await.unwrap();

        let ids: Vec<_> = store
            .list_chirps(None)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, [ChirpId(1), ChirpId(3)]);
        assert_eq!(store.get_chirp(ChirpId(3)).await.unwrap().body, "c");
    }

    #[tokio::test]
    async fn deleting_highest_id_allows_its_reuse() {
        let (_dir, store) = store().await;
        store.create_chirp("a", UserId(1)).await.unwrap();
        store.create_chirp("b", UserId(1)).await.unwrap();

        store.delete_chirp(ChirpId(2), UserId(1)).await.unwrap();
        let next = store.create_chirp("c", UserId(1)).await.unwrap();

        assert_eq!(next.id, ChirpId(2));
    }
}
