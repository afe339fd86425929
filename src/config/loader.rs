//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_LEGACY_BASE_URL: &str = "LEGACY_BASE_URL";
pub const ENV_LOCATIONS_BASE_URL: &str = "LOCATIONS_BASE_URL";
pub const ENV_ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_BIND_ADDRESS: &str = "BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, overlay the process
/// environment, and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_file(path)?,
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn parse_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment variables on top of `config`.
///
/// A variable that is set but empty still counts: an empty upstream origin
/// disables that route, an empty origin list permits every caller.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_LEGACY_BASE_URL) {
        config.upstreams.legacy_base_url = url.trim().to_string();
    }
    if let Some(url) = lookup(ENV_LOCATIONS_BASE_URL) {
        config.upstreams.locations_base_url = url.trim().to_string();
    }
    if let Some(origins) = lookup(ENV_ALLOWED_ORIGINS) {
        config.cors.allowed_origins = parse_allowed_origins(&origins);
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        if !level.trim().is_empty() {
            config.observability.log_level = level.trim().to_lowercase();
        }
    }
    if let Some(addr) = lookup(ENV_BIND_ADDRESS) {
        if !addr.trim().is_empty() {
            config.listener.bind_address = addr.trim().to_string();
        }
    }
}

/// Split a comma-separated origin list, dropping blank entries.
pub fn parse_allowed_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
