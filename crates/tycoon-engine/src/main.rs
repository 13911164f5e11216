//! Game server binary for the Tycoon simulation.
//!
//! Loads configuration, builds the engine with the system clock and a
//! seeded random source, and serves the HTTP API until terminated.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `tycoon-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Create the engine, starting a new game at the current instant
//! 4. Serve the HTTP API

mod error;

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;
use tycoon_core::clock::SystemClock;
use tycoon_core::config::{LoggingConfig, TycoonConfig};
use tycoon_core::random::SeededRandom;
use tycoon_core::Engine;
use tycoon_server::AppState;

use crate::error::EngineError;

/// Path of the configuration file, relative to the working directory.
const CONFIG_PATH: &str = "tycoon-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the server fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("tycoon-engine starting");
    if !from_file {
        info!("Config file not found, using defaults");
    }
    info!(
        company = config.world.name,
        seed = config.world.seed,
        auto_interval_secs = config.economy.auto_interval_secs,
        settle_interval_secs = config.economy.settle_interval_secs,
        escalate_interval_secs = config.threat.escalate_interval_secs,
        "Configuration loaded"
    );

    // 3. Create the engine.
    let api_config = config.server.clone();
    let rng = SeededRandom::from_optional_seed(config.world.seed);
    let engine = Engine::new(config, Box::new(SystemClock), Box::new(rng));
    info!(money = engine.state().money, "New game started");

    // 4. Serve.
    let app_state = Arc::new(AppState::new(engine));
    tycoon_server::start_server(&api_config, app_state)
        .await
        .map_err(EngineError::from)?;

    info!("tycoon-engine shut down");
    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load configuration from `tycoon-config.yaml`.
///
/// Falls back to defaults if the file does not exist. Environment
/// overrides apply either way. The flag reports whether the file was read.
fn load_config() -> Result<(TycoonConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        let config = TycoonConfig::from_file(config_path)?;
        Ok((config, true))
    } else {
        let mut config = TycoonConfig::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok((config, false))
    }
}
