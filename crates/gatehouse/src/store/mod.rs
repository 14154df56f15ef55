//! User store.
//!
//! The flows only see the [`UserStore`] trait. Uniqueness of usernames and
//! emails is the store's job and must hold under concurrent registrations;
//! a collision surfaces as [`StoreError::Duplicate`].

mod memory;
mod redis;

pub use self::memory::MemoryUserStore;
pub use self::redis::RedisUserStore;

use async_trait::async_trait;
use chromakey_common::{AuthError, IdentityField, NewUser, ProfileUpdate, User, UserId};
use thiserror::Error;

/// Store failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// Username or email already registered
    #[error("{0} already registered")]
    Duplicate(IdentityField),

    /// Redis connection/operation error
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    /// Stored data could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => AuthError::DuplicateIdentity(field),
            StoreError::Redis(e) => AuthError::Store(e.to_string()),
            StoreError::Serialization(e) => AuthError::Internal(e.to_string()),
        }
    }
}

/// Persistence for user records
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Create a user, allocating its id. Fails with `Duplicate` when the
    /// username or email is taken; nothing is written in that case.
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Apply a profile edit. Returns `None` when the user does not exist.
    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<Option<User>, StoreError>;

    /// Check backend connectivity
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Key used for the email uniqueness index
pub(crate) fn email_index_key(email: &str) -> String {
    email.trim().to_lowercase()
}
