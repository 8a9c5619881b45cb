//! Dual-source comparison for one identifier.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::probe::{LiveProbe, ProbeResult};

/// Both sources' answers for one identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub identifier: String,
    pub primary: ProbeResult,
    pub secondary: ProbeResult,
    /// Defined only when both probes succeeded.
    #[serde(rename = "match")]
    pub matched: Option<bool>,
    pub tested_at: DateTime<Utc>,
}

impl ComparisonResult {
    pub fn new(identifier: &str, primary: ProbeResult, secondary: ProbeResult) -> Self {
        let matched = reconcile(&primary, &secondary);
        Self {
            identifier: identifier.to_string(),
            primary,
            secondary,
            matched,
            tested_at: Utc::now(),
        }
    }
}

/// `Some(a == b)` when both probes succeeded, otherwise unknown.
pub fn reconcile(primary: &ProbeResult, secondary: &ProbeResult) -> Option<bool> {
    if primary.succeeded && secondary.succeeded {
        Some(primary.is_live == secondary.is_live)
    } else {
        None
    }
}

/// Runs two probes side by side over the same identifier.
#[derive(Clone)]
pub struct Comparator {
    primary: Arc<dyn LiveProbe>,
    secondary: Arc<dyn LiveProbe>,
}

impl Comparator {
    pub fn new(primary: Arc<dyn LiveProbe>, secondary: Arc<dyn LiveProbe>) -> Self {
        Self { primary, secondary }
    }

    pub fn primary(&self) -> &dyn LiveProbe {
        self.primary.as_ref()
    }

    pub fn secondary(&self) -> &dyn LiveProbe {
        self.secondary.as_ref()
    }

    /// Probe both sources concurrently and wait for both. A failure on one
    /// side never cancels the other.
    pub async fn compare(&self, identifier: &str) -> ComparisonResult {
        let (primary, secondary) = tokio::join!(
            self.primary.probe(identifier),
            self.secondary.probe(identifier)
        );

        let result = ComparisonResult::new(identifier, primary, secondary);
        tracing::debug!(
            identifier = %identifier,
            primary_live = ?result.primary.is_live,
            secondary_live = ?result.secondary.is_live,
            matched = ?result.matched,
            "Comparison complete"
        );
        result
    }
}
