//! Configuration management for Gatehouse.

use anyhow::{Context, Result, bail};
use chromakey_common::{HashParams, Palette};
use serde::Deserialize;
use std::path::Path;

use chromakey_common::constants::{
    DEFAULT_LISTEN_ADDR, DEFAULT_REDIS_URL, DEFAULT_SESSION_TTL_SECS, MAX_SESSION_TTL_SECS,
};

/// Where users and sessions are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Redis (production)
    Redis,
    /// Process memory, lost on restart (development)
    Memory,
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// User/session storage backend
    #[serde(default = "default_storage")]
    pub storage: StorageBackend,

    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Credential hashing cost
    #[serde(default)]
    pub hashing: HashingConfig,

    /// Deployment-specific palette; the standard palette when absent
    #[serde(default)]
    pub palette: Option<PaletteConfig>,
}

/// Session-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session validity in seconds
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,

    /// Mark the session cookie `Secure` (serve over HTTPS)
    #[serde(default)]
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl(),
            cookie_secure: false,
        }
    }
}

/// Argon2 cost parameters
#[derive(Debug, Clone, Deserialize)]
pub struct HashingConfig {
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,

    #[serde(default = "default_iterations")]
    pub iterations: u32,

    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

impl HashingConfig {
    pub fn params(&self) -> HashParams {
        HashParams {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }
}

/// Palette override: `symbols[i]` pairs with `colors[i]`
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteConfig {
    pub symbols: String,
    pub colors: Vec<String>,
}

// Default value functions
fn default_redis_url() -> String { DEFAULT_REDIS_URL.to_string() }
fn default_listen_addr() -> String { DEFAULT_LISTEN_ADDR.to_string() }
fn default_storage() -> StorageBackend { StorageBackend::Redis }
fn default_session_ttl() -> u64 { DEFAULT_SESSION_TTL_SECS }
fn default_memory_kib() -> u32 { HashParams::default().memory_kib }
fn default_iterations() -> u32 { HashParams::default().iterations }
fn default_parallelism() -> u32 { HashParams::default().parallelism }

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            // Use defaults if config file doesn't exist
            tracing::warn!("Config file not found, using defaults");
            Self::default()
        };

        // Apply CLI overrides
        if let Some(ref redis_url) = args.redis_url {
            config.redis_url = redis_url.clone();
        }
        if let Some(ref listen) = args.listen {
            config.listen_addr = listen.clone();
        }
        if let Some(storage) = args.storage {
            config.storage = storage;
        }

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.session.ttl_secs == 0 {
            bail!("session.ttl_secs must be greater than zero");
        }
        if self.session.ttl_secs > MAX_SESSION_TTL_SECS {
            bail!("session.ttl_secs must be at most {MAX_SESSION_TTL_SECS}");
        }
        Ok(())
    }

    /// Build the configured palette
    pub fn build_palette(&self) -> Result<Palette> {
        match &self.palette {
            Some(table) => Palette::from_table(&table.symbols, &table.colors)
                .context("Invalid palette in configuration"),
            None => Palette::standard().context("Invalid standard palette"),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            redis_url: default_redis_url(),
            listen_addr: default_listen_addr(),
            storage: default_storage(),
            session: SessionConfig::default(),
            hashing: HashingConfig::default(),
            palette: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn write_config(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!(
            "gatehouse-{name}-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_defaults_when_file_missing() {
        let args = crate::Args::parse_from(["gatehouse"]);
        let config = AppConfig::load("/nonexistent/gatehouse.toml", &args).unwrap();

        assert!(config.palette.is_none());
        assert!(!config.session.cookie_secure);
        assert_eq!(config.session.ttl_secs, DEFAULT_SESSION_TTL_SECS);
        assert_eq!(config.hashing.params(), HashParams::default());
        assert_eq!(config.build_palette().unwrap().len(), 62);
    }

    #[test]
    fn test_load_file_with_overrides() {
        let path = write_config(
            "overrides",
            r##"
listen_addr = "0.0.0.0:9000"
storage = "memory"

[session]
ttl_secs = 600
cookie_secure = true

[hashing]
memory_kib = 4096
iterations = 3

[palette]
symbols = "ab"
colors = ["#000000", "#ffffff"]
"##,
        );

        let args = crate::Args::parse_from(["gatehouse", "--listen", "127.0.0.1:7000"]);
        let config = AppConfig::load(&path, &args).unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:7000");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.session.ttl_secs, 600);
        assert!(config.session.cookie_secure);
        assert_eq!(config.hashing.memory_kib, 4096);
        assert_eq!(config.hashing.iterations, 3);
        assert_eq!(config.hashing.parallelism, 1);

        let palette = config.build_palette().unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.colors()[1].as_str(), "#FFFFFF");

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_invalid_palette_is_rejected() {
        let config = AppConfig {
            palette: Some(PaletteConfig {
                symbols: "abc".to_string(),
                colors: vec!["#000000".to_string()],
            }),
            ..Default::default()
        };
        assert!(config.build_palette().is_err());
    }

    #[test]
    fn test_zero_session_ttl_is_rejected() {
        let path = write_config("zero-ttl", "[session]\nttl_secs = 0\n");
        let args = crate::Args::parse_from(["gatehouse"]);
        assert!(AppConfig::load(&path, &args).is_err());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_oversized_session_ttl_is_rejected() {
        let path = write_config("huge-ttl", "[session]\nttl_secs = 9223372036854775808\n");
        let args = crate::Args::parse_from(["gatehouse"]);
        assert!(AppConfig::load(&path, &args).is_err());
        let _ = std::fs::remove_file(path);

        let mut config = AppConfig::default();
        config.session.ttl_secs = MAX_SESSION_TTL_SECS;
        assert!(config.validate().is_ok());
        config.session.ttl_secs = MAX_SESSION_TTL_SECS + 1;
        assert!(config.validate().is_err());
    }
}
