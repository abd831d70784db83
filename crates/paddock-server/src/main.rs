//! Paddock race API binary.
//!
//! Wires the upstream timing provider into the HTTP/WebSocket API and
//! serves until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `paddock-config.yaml` (or `PADDOCK_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Open the on-disk response cache, if enabled
//! 4. Build the `OpenF1` provider and session loader
//! 5. Build API settings (CORS origin, frame interval)
//! 6. Serve the race API

mod config;
mod error;

use std::path::PathBuf;
use std::sync::Arc;

use paddock_api::{ApiSettings, AppState, ServerConfig};
use paddock_source::{DiskCache, OpenF1Provider, SessionLoader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{DEFAULT_CONFIG_PATH, LogFormat, LoggingSection, PaddockConfig};
use crate::error::StartupError;

/// Application entry point for the Paddock server.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the server cannot
/// bind its listen address.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = std::env::var("PADDOCK_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = PaddockConfig::load(&config_path).map_err(StartupError::from)?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        config = %config_path.display(),
        upstream = config.upstream.base_url,
        cache_enabled = config.cache.enabled,
        frame_interval_ms = config.stream.frame_interval_ms,
        "paddock-server starting"
    );

    run(config).await?;

    info!("paddock-server stopped");
    Ok(())
}

async fn run(config: PaddockConfig) -> Result<(), StartupError> {
    // 3. Response cache.
    let cache = if config.cache.enabled {
        let cache = DiskCache::open(config.cache.dir.clone()).await?;
        info!(dir = %cache.dir().display(), "Response cache ready");
        Some(cache)
    } else {
        info!("Response cache disabled");
        None
    };

    // 4. Provider and loader.
    let provider = OpenF1Provider::new(&config.upstream.to_openf1(), cache)?;
    let loader = SessionLoader::new(Arc::new(provider));
    info!(provider = loader.provider_name(), "Upstream provider ready");

    // 5. API settings.
    let settings = ApiSettings::new(
        &config.server.allowed_origin,
        config.stream.frame_interval(),
    )?;
    let state = Arc::new(AppState::with_settings(loader, settings));

    // 6. Serve.
    let server = ServerConfig {
        host: config.server.host,
        port: config.server.port,
    };
    paddock_api::start_server(&server, state).await?;
    Ok(())
}

fn init_tracing(logging: &LoggingSection) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}
