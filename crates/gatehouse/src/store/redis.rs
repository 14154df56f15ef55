//! Redis-backed user store.
//!
//! Layout:
//! - `user:{id}` -> JSON user record
//! - `username:{username}` -> id
//! - `email:{lowercased email}` -> id
//! - `users:next_id` -> id sequence
//!
//! Index keys are claimed with `SET NX`, so two concurrent registrations
//! for the same username cannot both succeed.

use async_trait::async_trait;
use chromakey_common::constants::redis_keys::{
    EMAIL_PREFIX, USER_ID_SEQUENCE, USER_PREFIX, USERNAME_PREFIX,
};
use chromakey_common::{IdentityField, NewUser, ProfileUpdate, User, UserId};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use super::{StoreError, UserStore, email_index_key};

/// User store persisted in Redis
pub struct RedisUserStore {
    redis: ConnectionManager,
}

impl RedisUserStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    async fn load(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let mut conn = self.redis.clone();
        let data: Option<String> = conn.get(format!("{USER_PREFIX}{id}")).await?;

        match data {
            Some(d) => Ok(Some(serde_json::from_str(&d)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        let mut conn = self.redis.clone();
        let data = serde_json::to_string(user)?;
        conn.set::<_, _, ()>(format!("{USER_PREFIX}{}", user.id), data)
            .await?;
        Ok(())
    }

    /// Release index keys claimed by a registration that did not complete
    async fn release(&self, keys: &[String]) {
        let mut conn = self.redis.clone();
        for key in keys {
            if let Err(e) = conn.del::<_, ()>(key).await {
                tracing::error!(key = %key, error = %e, "Failed to release index key");
            }
        }
    }
}

#[async_trait]
impl UserStore for RedisUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.redis.clone();
        let id: Option<UserId> = conn.get(format!("{USERNAME_PREFIX}{username}")).await?;

        match id {
            Some(id) => self.load(id).await,
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.load(id).await
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut conn = self.redis.clone();
        let id: UserId = conn.incr(USER_ID_SEQUENCE, 1).await?;

        let username_key = format!("{USERNAME_PREFIX}{}", new_user.username);
        let email_key = format!("{EMAIL_PREFIX}{}", email_index_key(&new_user.email));

        let claimed: bool = conn.set_nx(&username_key, id).await?;
        if !claimed {
            return Err(StoreError::Duplicate(IdentityField::Username));
        }

        let claimed: bool = match conn.set_nx(&email_key, id).await {
            Ok(claimed) => claimed,
            Err(e) => {
                self.release(&[username_key]).await;
                return Err(e.into());
            }
        };
        if !claimed {
            self.release(&[username_key]).await;
            return Err(StoreError::Duplicate(IdentityField::Email));
        }

        let user = new_user.into_user(id);
        if let Err(e) = self.save(&user).await {
            self.release(&[username_key, email_key]).await;
            return Err(e);
        }

        tracing::debug!(user_id = id, "User record created");

        Ok(user)
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<Option<User>, StoreError> {
        let Some(mut user) = self.load(id).await? else {
            return Ok(None);
        };
        update.apply(&mut user);
        self.save(&user).await?;
        Ok(Some(user))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.redis.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
