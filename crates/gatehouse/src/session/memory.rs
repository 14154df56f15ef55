//! In-process session store (development mode and tests).

use async_trait::async_trait;
use chromakey_common::UserId;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{
    SessionProvider, SessionRecord, generate_session_token, hash_session_token, session_expiry,
};
use crate::store::StoreError;

/// Sessions kept in memory; expiry is checked on read
pub struct MemorySessionStore {
    ttl_secs: u64,
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl_secs,
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionProvider for MemorySessionStore {
    async fn establish(&self, user_id: UserId) -> Result<String, StoreError> {
        let token = generate_session_token();
        let now = chrono::Utc::now().timestamp();
        let record = SessionRecord {
            user_id,
            issued_at: now,
            expires_at: session_expiry(now, self.ttl_secs),
        };

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(hash_session_token(&token), record);

        Ok(token)
    }

    async fn current_user(&self, token: &str) -> Result<Option<UserId>, StoreError> {
        let now = chrono::Utc::now().timestamp();
        let sessions = self.sessions.read().await;

        Ok(sessions
            .get(&hash_session_token(token))
            .filter(|s| s.expires_at > now)
            .map(|s| s.user_id))
    }

    async fn clear(&self, token: &str) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .remove(&hash_session_token(token));
        Ok(())
    }

    fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }
}
