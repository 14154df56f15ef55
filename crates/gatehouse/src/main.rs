//! # Gatehouse - Chromakey authentication service
//!
//! Registration, login and profile endpoints for users whose password is
//! a sequence of (inner, outer) color pairs. Pairs are decoded through the
//! palette into a canonical text password, which is hashed and verified
//! like any other password.
//!
//! ## Architecture
//! ```text
//! Client → Gatehouse (decode → Argon2id) → Redis (users, sessions)
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod auth;
mod config;
mod routes;
mod session;
mod state;
mod store;

use chromakey_common::{GraphicalPasswordInput, codec};
use config::{AppConfig, StorageBackend};
use state::AppState;

/// Chromakey Gatehouse - graphical password authentication
#[derive(Parser, Debug)]
#[command(name = "gatehouse")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/gatehouse.toml")]
    config: String,

    /// Redis URL (overrides config)
    #[arg(long, env = "REDIS_URL")]
    redis_url: Option<String>,

    /// Listen address (overrides config)
    #[arg(short, long, env = "LISTEN_ADDR")]
    listen: Option<String>,

    /// Storage backend (overrides config)
    #[arg(long, env = "STORAGE", value_enum)]
    storage: Option<StorageBackend>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Print the color pairs that spell a canonical password
    Encode {
        /// Canonical password, two symbols per pair
        password: String,
    },

    /// Print the canonical password for a JSON list of color pairs
    Decode {
        /// e.g. '[["#FF0000","#00FF00"]]'
        pairs: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level, args.json_logs)?;

    // Load configuration
    let config = AppConfig::load(&args.config, &args)?;

    match &args.command {
        Some(Command::Encode { password }) => {
            let palette = config.build_palette()?;
            let input = codec::encode(&palette, password).context("Cannot encode password")?;
            println!("{}", input.to_json());
            Ok(())
        }
        Some(Command::Decode { pairs }) => {
            let palette = config.build_palette()?;
            let input = GraphicalPasswordInput::parse(pairs).context("Cannot parse pairs")?;
            let password = codec::decode(&palette, &input).context("Cannot decode pairs")?;
            println!("{}", password.as_str());
            Ok(())
        }
        Some(Command::Serve) | None => serve(config, &args.config).await,
    }
}

async fn serve(config: AppConfig, config_path: &str) -> Result<()> {
    info!("Starting Chromakey Gatehouse v{}", env!("CARGO_PKG_VERSION"));
    info!(storage = ?config.storage, "Configuration loaded from {}", config_path);

    // Initialize application state
    let state = AppState::new(config.clone()).await?;
    info!(colors = state.palette.len(), "Palette ready");

    // Build router
    let app = routes::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("Gatehouse listening on {}", config.listen_addr);

    // Handle graceful shutdown
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("Server error")?;

    info!("Gatehouse shutdown complete");
    Ok(())
}

/// Initialize structured logging with tracing
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init()
            .context("Failed to initialize logging")?;
    }

    Ok(())
}
