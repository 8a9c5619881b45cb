//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// API key for Source A.
pub const ENV_API_KEY: &str = "TIKAPI_KEY";
/// Overrides the Source A base URL.
pub const ENV_BASE_URL: &str = "TIKAPI_BASE_URL";
/// Listening port.
pub const ENV_PORT: &str = "PORT";
/// Comma-separated identifiers for the standalone script.
pub const ENV_TEST_USERS: &str = "TEST_USERS";
/// Turns Source B on or off.
pub const ENV_SECONDARY_ENABLED: &str = "LIVECHECK_SECONDARY_ENABLED";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {value:?}")]
    Env { var: &'static str, value: String },

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
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(ENV_API_KEY) {
        let key = key.trim();
        config.primary.api_key = (!key.is_empty()).then(|| key.to_string());
    }

    if let Some(base_url) = lookup(ENV_BASE_URL) {
        config.primary.base_url = base_url.trim().trim_end_matches('/').to_string();
    }

    if let Some(port) = lookup(ENV_PORT) {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::Env {
            var: ENV_PORT,
            value: port.clone(),
        })?;
        config.listener.bind_address = with_port(&config.listener.bind_address, port);
    }

    if let Some(users) = lookup(ENV_TEST_USERS) {
        let identifiers = parse_identifier_list(&users);
        if !identifiers.is_empty() {
            config.script.default_identifiers = identifiers;
        }
    }

    if let Some(flag) = lookup(ENV_SECONDARY_ENABLED) {
        config.secondary.enabled = match flag.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                return Err(ConfigError::Env {
                    var: ENV_SECONDARY_ENABLED,
                    value: flag,
                })
            }
        };
    }

    Ok(())
}

/// Split a comma-separated identifier list, dropping blanks.
pub fn parse_identifier_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn with_port(bind_address: &str, port: u16) -> String {
    let host = match bind_address.rsplit_once(':') {
        Some((host, _)) if !host.is_empty() => host,
        _ => "0.0.0.0",
    };
    format!("{}:{}", host, port)
}
