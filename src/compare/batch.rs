//! Sequential, paced batch execution.
//!
//! # Responsibilities
//! - Drive a probe or comparator over identifiers one at a time
//! - Sleep between items to stay under the upstream rate limit
//! - Reduce the collected results into a summary
//!
//! # Design Decisions
//! - Never concurrent across identifiers
//! - One failed identifier never aborts the rest
//! - A blank identifier is reported as a failed entry without any request
//! - The trailing delay after the last item is kept by default

use std::future::Future;
use std::time::Duration;

use uuid::Uuid;

use crate::compare::comparator::{Comparator, ComparisonResult};
use crate::compare::stats::{ComparisonSummary, ProbeBatchSummary};
use crate::config::BatchConfig;
use crate::observability::metrics;
use crate::probe::{LiveProbe, ProbeError, ProbeResult};

#[derive(Debug, Clone, Copy)]
pub struct BatchRunner {
    pacing: Duration,
    trailing_delay: bool,
}

impl BatchRunner {
    pub fn new(pacing: Duration, trailing_delay: bool) -> Self {
        Self {
            pacing,
            trailing_delay,
        }
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        Self::new(Duration::from_millis(config.pacing_ms), config.trailing_delay)
    }

    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// Number of pacing sleeps a batch of `items` identifiers performs.
    pub fn delay_count(&self, items: usize) -> usize {
        if self.pacing.is_zero() || items == 0 {
            0
        } else if self.trailing_delay {
            items
        } else {
            items - 1
        }
    }

    async fn paced<T, F, Fut>(&self, identifiers: &[String], mut step: F) -> Vec<T>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = T>,
    {
        let mut results = Vec::with_capacity(identifiers.len());
        let last = identifiers.len().saturating_sub(1);

        for (index, identifier) in identifiers.iter().enumerate() {
            results.push(step(identifier.clone()).await);

            if !self.pacing.is_zero() && (self.trailing_delay || index < last) {
                tokio::time::sleep(self.pacing).await;
            }
        }

        results
    }

    /// Probe each identifier with a single source.
    pub async fn run_probes(&self, probe: &dyn LiveProbe, identifiers: &[String]) -> ProbeBatchSummary {
        let run_id = Uuid::new_v4();
        tracing::info!(
            run_id = %run_id,
            source = %probe.source(),
            count = identifiers.len(),
            pacing_ms = self.pacing.as_millis() as u64,
            "Probe batch starting"
        );

        let results = self
            .paced(identifiers, |identifier| async move {
                if identifier.is_empty() {
                    rejected(&identifier)
                } else {
                    probe.probe(&identifier).await
                }
            })
            .await;
        let summary = ProbeBatchSummary::from_results(run_id, results);

        metrics::record_batch("probe", summary.stats.total);
        tracing::info!(
            run_id = %run_id,
            total = summary.stats.total,
            success_count = summary.stats.success_count,
            average_latency_ms = summary.stats.average_latency_ms,
            "Probe batch complete"
        );
        summary
    }

    /// Compare both sources for each identifier.
    pub async fn run_comparisons(
        &self,
        comparator: &Comparator,
        identifiers: &[String],
    ) -> ComparisonSummary {
        let run_id = Uuid::new_v4();
        tracing::info!(
            run_id = %run_id,
            count = identifiers.len(),
            pacing_ms = self.pacing.as_millis() as u64,
            "Comparison batch starting"
        );

        let results = self
            .paced(identifiers, |identifier| async move {
                if identifier.is_empty() {
                    ComparisonResult::new(&identifier, rejected(&identifier), rejected(&identifier))
                } else {
                    comparator.compare(&identifier).await
                }
            })
            .await;
        let summary = ComparisonSummary::from_results(run_id, results);

        metrics::record_batch("compare", summary.total);
        tracing::info!(
            run_id = %run_id,
            total = summary.total,
            match_count = summary.match_count,
            comparable_count = summary.comparable_count,
            "Comparison batch complete"
        );
        summary
    }
}

fn rejected(identifier: &str) -> ProbeResult {
    ProbeResult::failed(identifier, 0.0, ProbeError::EmptyIdentifier)
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::from_config(&BatchConfig::default())
    }
}
