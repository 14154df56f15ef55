//! Session / identity provider.
//!
//! Tokens are random and handed to the client once. Stores only ever see
//! the SHA-256 of a token.

mod memory;
mod redis;

pub use self::memory::MemorySessionStore;
pub use self::redis::RedisSessionStore;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chromakey_common::UserId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::store::StoreError;

/// Session data kept server side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: UserId,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Establishes and resolves authenticated sessions
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Start a session for `user_id`, returning the raw token
    async fn establish(&self, user_id: UserId) -> Result<String, StoreError>;

    /// Resolve a raw token to its user, if the session is live
    async fn current_user(&self, token: &str) -> Result<Option<UserId>, StoreError>;

    /// End the session; unknown tokens are ignored
    async fn clear(&self, token: &str) -> Result<(), StoreError>;

    /// Session lifetime in seconds
    fn ttl_secs(&self) -> u64;
}

/// Generate a cryptographically secure session token
pub fn generate_session_token() -> String {
    use rand::Rng;

    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Expiry timestamp for a session issued at `now`, saturating on overflow
pub fn session_expiry(now: i64, ttl_secs: u64) -> i64 {
    now.saturating_add(i64::try_from(ttl_secs).unwrap_or(i64::MAX))
}

/// Storage key for a token
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}
