//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and upstream URLs
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Single-identifier requests must outlast the probes they wait on
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - A missing API key is not an error here; it fails individual requests

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid http(s) URL {value:?}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("timeouts.request_secs ({request_secs}s) must exceed the longest probe timeout ({probe_timeout_ms}ms)")]
    RequestTimeoutTooShort {
        request_secs: u64,
        probe_timeout_ms: u64,
    },
}

pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    check_url(&mut errors, "primary.base_url", &config.primary.base_url);
    if config.secondary.enabled {
        check_url(&mut errors, "secondary.base_url", &config.secondary.base_url);
    }

    for (field, value) in [
        ("primary.timeout_ms", config.primary.timeout_ms),
        ("secondary.timeout_ms", config.secondary.timeout_ms),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("batch.max_identifiers", config.batch.max_identifiers as u64),
        ("script.iterations", u64::from(config.script.iterations)),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    let probe_timeout_ms = if config.secondary.enabled {
        config.primary.timeout_ms.max(config.secondary.timeout_ms)
    } else {
        config.primary.timeout_ms
    };
    let request_secs = config.timeouts.request_secs;
    if request_secs > 0 && request_secs.saturating_mul(1000) <= probe_timeout_ms {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request_secs,
            probe_timeout_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let valid = Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.primary.base_url = "ftp://example.com".into();
        config.primary.timeout_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::Zero { field: "primary.timeout_ms" }));
    }

    #[test]
    fn test_disabled_secondary_url_not_checked() {
        let mut config = ServiceConfig::default();
        config.secondary.enabled = false;
        config.secondary.base_url = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_request_timeout_must_outlast_probes() {
        let mut config = ServiceConfig::default();
        config.timeouts.request_secs = 15;
        config.secondary.timeout_ms = 20_000;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::RequestTimeoutTooShort {
                request_secs: 15,
                probe_timeout_ms: 20_000,
            }]
        );

        config.secondary.enabled = false;
        assert!(validate_config(&config).is_ok());
    }
}
