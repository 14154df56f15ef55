//! Application state and shared resources.

use anyhow::{Context, Result};
use chromakey_common::{CredentialVerifier, Palette};
use redis::aio::ConnectionManager;
use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::{AppConfig, StorageBackend};
use crate::session::{MemorySessionStore, RedisSessionStore, SessionProvider};
use crate::store::{MemoryUserStore, RedisUserStore, UserStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Palette, built once at startup and never modified
    pub palette: Arc<Palette>,

    /// Registration/login/profile flows
    pub auth: AuthService,

    /// Process start (Unix epoch seconds)
    pub started_at: i64,
}

impl AppState {
    /// Create new application state, connecting to the configured storage
    pub async fn new(config: AppConfig) -> Result<Self> {
        let palette = Arc::new(config.build_palette()?);
        let verifier = Arc::new(
            CredentialVerifier::new(config.hashing.params())
                .context("Failed to initialize credential hashing")?,
        );

        let (users, sessions): (Arc<dyn UserStore>, Arc<dyn SessionProvider>) =
            match config.storage {
                StorageBackend::Redis => {
                    // Connect to Redis with connection manager (handles reconnection)
                    let client = redis::Client::open(config.redis_url.as_str())
                        .context("Failed to create Redis client")?;

                    let redis = ConnectionManager::new(client)
                        .await
                        .context("Failed to connect to Redis")?;

                    (
                        Arc::new(RedisUserStore::new(redis.clone())),
                        Arc::new(RedisSessionStore::new(redis, config.session.ttl_secs)),
                    )
                }
                StorageBackend::Memory => {
                    tracing::warn!(
                        "Using in-memory storage; users and sessions are lost on restart"
                    );
                    (
                        Arc::new(MemoryUserStore::new()),
                        Arc::new(MemorySessionStore::new(config.session.ttl_secs)),
                    )
                }
            };

        let auth = AuthService::new(palette.clone(), verifier, users, sessions);

        Ok(Self {
            config,
            palette,
            auth,
            started_at: chrono::Utc::now().timestamp(),
        })
    }
}
