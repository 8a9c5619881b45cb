//! Probe result types and error definitions.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which data source produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeSource {
    /// Source A, the commercial data API.
    Primary,
    /// Source B, the public room endpoint.
    Secondary,
}

impl ProbeSource {
    /// Stable label used in logs and metrics.
    pub fn label(self) -> &'static str {
        match self {
            ProbeSource::Primary => "tikapi",
            ProbeSource::Secondary => "tiktok_live",
        }
    }
}

impl fmt::Display for ProbeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one live-status check against one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub identifier: String,
    #[serde(rename = "success")]
    pub succeeded: bool,
    pub is_live: Option<bool>,
    #[serde(rename = "response_time_ms")]
    pub latency_ms: f64,
    pub error: Option<String>,
}

impl ProbeResult {
    pub fn live(identifier: &str, is_live: bool, latency_ms: f64) -> Self {
        Self {
            identifier: identifier.to_string(),
            succeeded: true,
            is_live: Some(is_live),
            latency_ms,
            error: None,
        }
    }

    pub fn failed(identifier: &str, latency_ms: f64, error: impl fmt::Display) -> Self {
        Self {
            identifier: identifier.to_string(),
            succeeded: false,
            is_live: None,
            latency_ms,
            error: Some(error.to_string()),
        }
    }
}

/// Errors captured at the probe boundary. These never escape a probe;
/// they are rendered into [`ProbeResult::error`].
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("timeout after {0}ms")]
    Timeout(u64),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Unavailable(&'static str),

    #[error("identifier must not be empty")]
    EmptyIdentifier,
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        ProbeError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_wire_names() {
        let result = ProbeResult::live("alice", true, 12.5);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["is_live"], true);
        assert_eq!(json["response_time_ms"], 12.5);
        assert!(json["error"].is_null());
    }

    #[test]
    fn test_failed_result_has_no_live_flag() {
        let result = ProbeResult::failed("bob", 3.0, ProbeError::Timeout(15_000));
        assert!(!result.succeeded);
        assert_eq!(result.is_live, None);
        assert_eq!(result.error.as_deref(), Some("timeout after 15000ms"));
    }
}
