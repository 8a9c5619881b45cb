//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the live-status service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Source A: the commercial data API.
    pub primary: PrimarySourceConfig,

    /// Source B: the public room endpoint, optionally disabled.
    pub secondary: SecondarySourceConfig,

    /// Batch pacing and limits.
    pub batch: BatchConfig,

    /// Timeout configuration for the HTTP surface.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Standalone script defaults.
    pub script: ScriptConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Source A configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PrimarySourceConfig {
    /// API base URL, without trailing slash.
    pub base_url: String,

    /// API key sent as `X-API-KEY`. Requests fail with a configuration
    /// error while this is unset.
    pub api_key: Option<String>,

    /// Per-probe timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for PrimarySourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tikapi.io/public/v1".to_string(),
            api_key: None,
            timeout_ms: 15_000,
        }
    }
}

/// Source B configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecondarySourceConfig {
    /// When false every secondary probe short-circuits to "unavailable".
    pub enabled: bool,

    /// Origin hosting the room endpoint.
    pub base_url: String,

    /// Per-probe timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for SecondarySourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://www.tiktok.com".to_string(),
            timeout_ms: 15_000,
        }
    }
}

/// Batch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Delay inserted between batch items in milliseconds.
    pub pacing_ms: u64,

    /// Also wait after the last item.
    pub trailing_delay: bool,

    /// Largest accepted bulk request.
    pub max_identifiers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            pacing_ms: 500,
            trailing_delay: true,
            max_identifiers: 100,
        }
    }
}

/// Timeout configuration for the HTTP surface.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout for single-identifier routes, in seconds. Bulk
    /// routes are not cut off.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Defaults for the standalone batch script.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Identifiers checked when none are given on the command line.
    pub default_identifiers: Vec<String>,

    /// Where the JSON report is written.
    pub output_path: String,

    /// Delay between items in milliseconds.
    pub pacing_ms: u64,

    /// How many times the identifier list is run.
    pub iterations: u32,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            default_identifiers: vec!["takehiko1026".to_string()],
            output_path: "test_results.json".to_string(),
            pacing_ms: 1000,
            iterations: 1,
        }
    }
}
