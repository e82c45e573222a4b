//! Process configuration, read once at startup.
//!
//! Every handler receives its configuration explicitly; nothing in the
//! request path reads the environment.

mod cors;
mod deployer;
mod probe;
mod server;

pub use cors::CorsConfig;
pub use deployer::DeployerConfig;
pub use probe::ProbeConfig;
pub use server::ServerConfig;

use crate::error::{AppError, AppResult};
use std::env;

/// Configuration for the API handler
#[derive(Debug, Clone)]
pub struct Config {
    pub cors: CorsConfig,
    pub probe: ProbeConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = lookup("CORS_ENABLED")
            .unwrap_or_else(|| "true".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("Invalid CORS_ENABLED".to_string()))?;

        let config = Config {
            cors: CorsConfig {
                enabled,
                allowed_origins: parse_list(lookup("ALLOWED_ORIGINS").as_deref()),
                allowed_methods: parse_list(lookup("ALLOWED_METHODS").as_deref()),
                allowed_headers: parse_list(lookup("ALLOWED_HEADERS").as_deref()),
            },
            probe: ProbeConfig {
                secret_ids: parse_list(lookup("SECRET_ARNS").as_deref()),
            },
        };

        tracing::debug!(
            cors_enabled = config.cors.enabled,
            allowed_origins = config.cors.allowed_origins.len(),
            secrets = config.probe.secret_ids.len(),
            "Configuration loaded"
        );

        Ok(config)
    }
}

/// Parse a JSON-encoded array of strings.
///
/// Missing, malformed or non-array values yield an empty list. Non-string
/// elements are skipped.
pub fn parse_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
