//! User collection operations.
//!
//! Password hashing is slow and runs before the exclusive lock is taken, so
//! other requests are not held up behind it. Email uniqueness is checked
//! again inside the critical section.

use super::{Store, next_id};
use crate::auth::password::hash_password;
use crate::domain::{User, UserId};
use crate::error::{Error, Result};

impl Store {
    /// Registers a new user and returns it with its assigned id.
    ///
    /// The password is hashed with a random salt; only the digest is stored.
    /// New users start without the upgrade flag.
    ///
    /// # Errors
    ///
    /// - `Error::EmailTaken` if the email is already registered; nothing is
    ///   written in that case
    /// - `Error::Hashing` if the password cannot be hashed
    pub async fn create_user(&self, email: &str, password: &str) -> Result<User> {
        if self.read(|doc| Ok(doc.user_by_email(email).is_some())).await? {
            return Err(Error::EmailTaken(email.to_string()));
        }

        let password_hash = hash_password(password).await?;
        let user = self
            .transact(|doc| {
                if doc.user_by_email(email).is_some() {
                    return Err(Error::EmailTaken(email.to_string()));
                }
                let id = UserId(next_id(doc.users.values().map(|u| u.id.0)));
                let user = User {
                    id,
                    email: email.to_string(),
                    password_hash,
                    is_upgraded: false,
                };
                doc.users.insert(id.0, user.clone());
                Ok(user)
            })
            .await?;

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    /// Replaces a user's email and upgrade flag, and its password when one is
    /// supplied.
    ///
    /// Email uniqueness is not re-checked on update.
    ///
    /// # Errors
    ///
    /// - `Error::UserNotFound` if no user has this id
    /// - `Error::Hashing` if the new password cannot be hashed
    pub async fn update_user(
        &self,
        id: UserId,
        email: &str,
        password: Option<&str>,
        is_upgraded: bool,
    ) -> Result<User> {
        self.apply_update(id, email, password, Some(is_upgraded))
            .await
    }

    /// Replaces a user's email, and its password when one is supplied,
    /// leaving the upgrade flag as stored.
    ///
    /// The flag is read inside the same critical section as the write, so an
    /// upgrade landing concurrently is never rolled back.
    ///
    /// # Errors
    ///
    /// - `Error::UserNotFound` if no user has this id
    /// - `Error::Hashing` if the new password cannot be hashed
    pub async fn update_credentials(
        &self,
        id: UserId,
        email: &str,
        password: Option<&str>,
    ) -> Result<User> {
        self.apply_update(id, email, password, None).await
    }

    async fn apply_update(
        &self,
        id: UserId,
        email: &str,
        password: Option<&str>,
        is_upgraded: Option<bool>,
    ) -> Result<User> {
        let new_hash = match password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let user = self
            .transact(|doc| {
                let user = doc
                    .users
                    .values_mut()
                    .find(|user| user.id == id)
                    .ok_or(Error::UserNotFound(id))?;
                user.email = email.to_string();
                if let Some(flag) = is_upgraded {
                    user.is_upgraded = flag;
                }
                if let Some(hash) = new_hash {
                    user.password_hash = hash;
                }
                Ok(user.clone())
            })
            .await?;

        tracing::info!(user_id = %id, password_changed = password.is_some(), "Updated user");
        Ok(user)
    }

    /// Sets the upgrade flag on a user.
    ///
    /// Upgrading an already upgraded user succeeds and changes nothing
    /// visible.
    ///
    /// # Errors
    ///
    /// Returns `Error::UserNotFound` if no user has this id.
    pub async fn upgrade_user(&self, id: UserId) -> Result<User> {
        let user = self
            .transact(|doc| {
                let user = doc
                    .users
                    .values_mut()
                    .find(|user| user.id == id)
                    .ok_or(Error::UserNotFound(id))?;
                user.is_upgraded = true;
                Ok(user.clone())
            })
            .await?;

        tracing::info!(user_id = %id, "Upgraded user");
        Ok(user)
    }

    /// Fetches a user by id.
    ///
    /// # Errors
    ///
    /// Returns `Error::UserNotFound` if no user has this id.
    pub async fn get_user(&self, id: UserId) -> Result<User> {
        self.read(|doc| doc.user(id).cloned().ok_or(Error::UserNotFound(id)))
            .await
    }

    /// Fetches a user by exact email match.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmailNotFound` if no user has this email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<User> {
        self.read(|doc| {
            doc.user_by_email(email)
                .cloned()
                .ok_or_else(|| Error::EmailNotFound(email.to_string()))
        })
        .await
    }

    /// Lists all users in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns a load error if the backing file cannot be read.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.read(|doc| {
            let mut users: Vec<User> = doc.users.values().cloned().collect();
            users.sort_by_key(|user| user.id);
            Ok(users)
        })
        .await
    }
}
