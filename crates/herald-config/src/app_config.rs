//! Application configuration structures.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote notification API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Redis cache configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Environment (development, staging, production).
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            redis: RedisConfig::default(),
            environment: default_environment(),
        }
    }
}

fn default_environment() -> String {
    "development".to_string()
}

/// Remote notification API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the notification API.
    pub base_url: String,
    /// Client identifier, used as the `iss` claim when signing requests.
    pub client_id: String,
    /// Shared secret for request signing.
    pub secret: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Returns the request timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:6011".to_string(),
            client_id: "herald-admin".to_string(),
            secret: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Redis cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis URL.
    pub url: String,
    /// Connection pool size.
    pub pool_size: u32,
    /// Enable Redis (can be disabled for local development).
    pub enabled: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            pool_size: 10,
            enabled: true,
        }
    }
}
