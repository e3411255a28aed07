//! Domain types for the chirpy datastore.
//!
//! The whole database is one [`Document`] holding three collections. Each
//! collection maps an integer storage key to a record. New records are stored
//! under a key equal to their own id, and keys are never reassigned.
//!
//! Lookups go through the records' `id` fields rather than the storage keys,
//! so files written by older deployments, which numbered keys from zero and
//! renumbered them after deletions, still load and resolve correctly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier for a chirp
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChirpId(pub u64);

/// Unique identifier for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for ChirpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChirpId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A short post written by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    /// Store-assigned identifier
    #[serde(alias = "Id")]
    pub id: ChirpId,

    /// Unfiltered body text as submitted
    #[serde(alias = "Body")]
    pub body: String,

    /// The user who wrote the chirp
    #[serde(alias = "AuthorId")]
    pub author_id: UserId,
}

/// A registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier
    #[serde(alias = "Id")]
    pub id: UserId,

    /// Login email, unique across users at creation time
    #[serde(alias = "Email")]
    pub email: String,

    /// PHC-format password digest, never the plaintext
    #[serde(alias = "Password")]
    pub password_hash: String,

    /// Whether the account has been upgraded by the payment provider
    #[serde(alias = "is_chirpy_red", alias = "IsChirpyRed", default)]
    pub is_upgraded: bool,
}

/// A refresh token that may no longer be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revocation {
    /// The raw token string as presented by the client
    #[serde(alias = "Token")]
    pub token: String,

    /// When the token was revoked
    #[serde(alias = "Time")]
    pub revoked_at: DateTime<Utc>,
}

/// The root object persisted to the backing file.
///
/// Every collection is absent-safe: a missing or `null` collection reads as
/// an empty map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Chirps keyed by storage key
    #[serde(default, deserialize_with = "null_as_empty")]
    pub chirps: BTreeMap<u64, Chirp>,

    /// Users keyed by storage key
    #[serde(default, deserialize_with = "null_as_empty")]
    pub users: BTreeMap<u64, User>,

    /// Revocations keyed by sequential index
    #[serde(default, deserialize_with = "null_as_empty")]
    pub revocations: BTreeMap<u64, Revocation>,
}

impl Document {
    /// Finds a chirp by its `id` field.
    #[must_use]
    pub fn chirp(&self, id: ChirpId) -> Option<&Chirp> {
        self.chirps.values().find(|chirp| chirp.id == id)
    }

    /// Finds a user by its `id` field.
    #[must_use]
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.values().find(|user| user.id == id)
    }

    /// Finds a user by exact email match.
    #[must_use]
    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|user| user.email == email)
    }

    /// Returns `true` if the given token string has been revoked.
    #[must_use]
    pub fn is_revoked(&self, token: &str) -> bool {
        self.revocations.values().any(|r| r.token == token)
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
