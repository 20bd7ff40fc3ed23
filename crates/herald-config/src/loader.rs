//! Configuration loader with layered sources.

use crate::AppConfig;
use config::{Config, ConfigError, Environment, File};
use herald_core::HeraldError;
use std::path::Path;
use tracing::{debug, info};

/// Loads configuration from the default location (`./config`).
pub fn from_default_location() -> Result<AppConfig, HeraldError> {
    load("./config")
}

/// Loads configuration from the specified directory.
///
/// Configuration is loaded from multiple sources in order:
/// 1. `{config_dir}/default.toml` - Default values
/// 2. `{config_dir}/{environment}.toml` - Environment-specific overrides
/// 3. `{config_dir}/local.toml` - Local overrides (not committed)
/// 4. Environment variables with `HERALD_` prefix
pub fn load(config_dir: &str) -> Result<AppConfig, HeraldError> {
    // Load .env file if present
    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file found or error loading it: {}", e);
    }

    let environment =
        std::env::var("HERALD_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

    info!("Loading configuration for environment: {}", environment);

    let mut builder = Config::builder();

    let default_path = format!("{}/default.toml", config_dir);
    if Path::new(&default_path).exists() {
        debug!("Loading default config from: {}", default_path);
        builder = builder.add_source(File::with_name(&default_path).required(false));
    }

    let env_path = format!("{}/{}.toml", config_dir, environment);
    if Path::new(&env_path).exists() {
        debug!("Loading environment config from: {}", env_path);
        builder = builder.add_source(File::with_name(&env_path).required(false));
    }

    let local_path = format!("{}/local.toml", config_dir);
    if Path::new(&local_path).exists() {
        debug!("Loading local config from: {}", local_path);
        builder = builder.add_source(File::with_name(&local_path).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("HERALD")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build().map_err(config_error_to_herald_error)?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(config_error_to_herald_error)?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validates the configuration.
fn validate_config(config: &AppConfig) -> Result<(), HeraldError> {
    if config.api.base_url.is_empty() {
        return Err(HeraldError::configuration("API base URL is required"));
    }

    if config.api.secret.is_empty() {
        return Err(HeraldError::configuration("API signing secret is required"));
    }

    if config.redis.enabled && config.redis.url.is_empty() {
        return Err(HeraldError::configuration(
            "Redis URL is required when the cache is enabled",
        ));
    }

    Ok(())
}

fn config_error_to_herald_error(err: ConfigError) -> HeraldError {
    HeraldError::Configuration(err.to_string())
}
