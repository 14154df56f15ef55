//! In-process user store (development mode and tests).

use async_trait::async_trait;
use chromakey_common::{IdentityField, NewUser, ProfileUpdate, User, UserId};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{StoreError, UserStore, email_index_key};

#[derive(Default)]
struct Tables {
    last_id: UserId,
    users: HashMap<UserId, User>,
    by_username: HashMap<String, UserId>,
    by_email: HashMap<String, UserId>,
}

/// User store kept in memory; contents are lost on restart
#[derive(Default)]
pub struct MemoryUserStore {
    tables: RwLock<Tables>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_username
            .get(username)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        let email_key = email_index_key(&new_user.email);

        if tables.by_username.contains_key(&new_user.username) {
            return Err(StoreError::Duplicate(IdentityField::Username));
        }
        if tables.by_email.contains_key(&email_key) {
            return Err(StoreError::Duplicate(IdentityField::Email));
        }

        tables.last_id += 1;
        let user = new_user.into_user(tables.last_id);

        tables.by_username.insert(user.username.clone(), user.id);
        tables.by_email.insert(email_key, user.id);
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        update.apply(user);
        Ok(Some(user.clone()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromakey_common::CredentialRecord;
    use std::sync::Arc;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            full_name: "Test User".to_string(),
            credential: CredentialRecord::from_phc("$argon2id$test"),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryUserStore::new();
        let user = store
            .create(new_user("john123", "john@example.com"))
            .await
            .unwrap();
        assert_eq!(user.id, 1);

        let by_name = store.find_by_username("john123").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);
        let by_id = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "john@example.com");

        assert!(store.find_by_username("nobody").await.unwrap().is_none());
        assert!(store.find_by_id(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email() {
        let store = MemoryUserStore::new();
        store
            .create(new_user("john123", "john@example.com"))
            .await
            .unwrap();

        let err = store
            .create(new_user("john123", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(IdentityField::Username)));

        let err = store
            .create(new_user("jane", "JOHN@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(IdentityField::Email)));

        // failed creations leave no trace
        assert!(store.find_by_username("jane").await.unwrap().is_none());
        let next = store.create(new_user("jane", "jane@example.com")).await;
        assert_eq!(tokio_test::assert_ok!(next).id, 2);
    }

    #[tokio::test]
    async fn test_concurrent_registration_single_winner() {
        let store = Arc::new(MemoryUserStore::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create(new_user("racer", &format!("racer{i}@example.com")))
                    .await
                    .is_ok()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_update_profile() {
        let store = MemoryUserStore::new();
        let user = store
            .create(new_user("john123", "john@example.com"))
            .await
            .unwrap();

        let updated = store
            .update_profile(
                user.id,
                ProfileUpdate {
                    full_name: Some("John Doe".to_string()),
                    bio: Some("Likes colors".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.full_name, "John Doe");
        assert_eq!(updated.bio.as_deref(), Some("Likes colors"));
        assert_eq!(updated.credential, user.credential);

        let missing = store
            .update_profile(42, ProfileUpdate::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
