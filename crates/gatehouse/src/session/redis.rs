//! Redis-backed sessions: `session:{sha256(token)}` -> JSON record, with TTL.

use async_trait::async_trait;
use chromakey_common::UserId;
use chromakey_common::constants::redis_keys::SESSION_PREFIX;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use super::{
    SessionProvider, SessionRecord, generate_session_token, hash_session_token, session_expiry,
};
use crate::store::StoreError;

/// Session store persisted in Redis
pub struct RedisSessionStore {
    redis: ConnectionManager,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(redis: ConnectionManager, ttl_secs: u64) -> Self {
        Self { redis, ttl_secs }
    }

    fn key(token: &str) -> String {
        format!("{SESSION_PREFIX}{}", hash_session_token(token))
    }
}

#[async_trait]
impl SessionProvider for RedisSessionStore {
    async fn establish(&self, user_id: UserId) -> Result<String, StoreError> {
        let token = generate_session_token();
        let now = chrono::Utc::now().timestamp();
        let record = SessionRecord {
            user_id,
            issued_at: now,
            expires_at: session_expiry(now, self.ttl_secs),
        };

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(Self::key(&token), serde_json::to_string(&record)?, self.ttl_secs)
            .await?;

        Ok(token)
    }

    async fn current_user(&self, token: &str) -> Result<Option<UserId>, StoreError> {
        let mut conn = self.redis.clone();
        let data: Option<String> = conn.get(Self::key(token)).await?;

        match data {
            Some(d) => {
                let record: SessionRecord = serde_json::from_str(&d)?;
                Ok(Some(record.user_id))
            }
            None => Ok(None),
        }
    }

    async fn clear(&self, token: &str) -> Result<(), StoreError> {
        let mut conn = self.redis.clone();
        conn.del::<_, ()>(Self::key(token)).await?;
        Ok(())
    }

    fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }
}
