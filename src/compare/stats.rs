//! Batch aggregation.
//!
//! Rates are percentages. Every rate and average falls back to 0 when its
//! denominator is empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::compare::comparator::ComparisonResult;
use crate::probe::ProbeResult;

/// Per-source statistics over a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeStats {
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub success_rate: f64,
    /// Mean latency over successful probes only.
    pub average_latency_ms: f64,
    pub live_count: usize,
    pub offline_count: usize,
}

impl ProbeStats {
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ProbeResult>,
    {
        let mut total = 0;
        let mut success_count = 0;
        let mut live_count = 0;
        let mut latency_sum = 0.0;

        for result in results {
            total += 1;
            if result.succeeded {
                success_count += 1;
                latency_sum += result.latency_ms;
                if result.is_live == Some(true) {
                    live_count += 1;
                }
            }
        }

        Self {
            total,
            success_count,
            failure_count: total - success_count,
            success_rate: percentage(success_count, total),
            average_latency_ms: round2(mean(latency_sum, success_count)),
            live_count,
            offline_count: success_count - live_count,
        }
    }

    /// Success rate formatted with one decimal, e.g. `75.0%`.
    pub fn success_rate_display(&self) -> String {
        format!("{:.1}%", self.success_rate)
    }
}

/// Summary of a single-source batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeBatchSummary {
    pub run_id: Uuid,
    #[serde(flatten)]
    pub stats: ProbeStats,
    pub results: Vec<ProbeResult>,
    pub tested_at: DateTime<Utc>,
}

impl ProbeBatchSummary {
    pub fn from_results(run_id: Uuid, results: Vec<ProbeResult>) -> Self {
        Self {
            run_id,
            stats: ProbeStats::from_results(&results),
            results,
            tested_at: Utc::now(),
        }
    }
}

/// Summary of a dual-source batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub run_id: Uuid,
    pub total: usize,
    pub primary: ProbeStats,
    pub secondary: ProbeStats,
    pub match_count: usize,
    pub mismatch_count: usize,
    /// Entries where both sources succeeded and a match is defined.
    pub comparable_count: usize,
    /// `match_count / comparable_count`, as a percentage.
    pub match_rate: f64,
    pub results: Vec<ComparisonResult>,
    pub tested_at: DateTime<Utc>,
}

impl ComparisonSummary {
    pub fn from_results(run_id: Uuid, results: Vec<ComparisonResult>) -> Self {
        let primary = ProbeStats::from_results(results.iter().map(|r| &r.primary));
        let secondary = ProbeStats::from_results(results.iter().map(|r| &r.secondary));
        let match_count = results.iter().filter(|r| r.matched == Some(true)).count();
        let mismatch_count = results.iter().filter(|r| r.matched == Some(false)).count();
        let comparable_count = match_count + mismatch_count;

        Self {
            run_id,
            total: results.len(),
            primary,
            secondary,
            match_count,
            mismatch_count,
            comparable_count,
            match_rate: percentage(match_count, comparable_count),
            results,
            tested_at: Utc::now(),
        }
    }
}

pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(id: &str, live: bool, latency: f64) -> ProbeResult {
        ProbeResult::live(id, live, latency)
    }

    fn failed(id: &str, latency: f64) -> ProbeResult {
        ProbeResult::failed(id, latency, "timeout after 15000ms")
    }

    #[test]
    fn test_success_rate_is_exact() {
        let results = vec![
            ok("a", true, 10.0),
            ok("b", false, 20.0),
            ok("c", false, 30.0),
            failed("d", 15_000.0),
        ];
        let stats = ProbeStats::from_results(&results);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.success_count, 3);
        assert_eq!(stats.failure_count, 1);
        assert_eq!(stats.success_rate, 75.0);
        assert_eq!(stats.success_rate_display(), "75.0%");
        assert_eq!(stats.average_latency_ms, 20.0);
        assert_eq!(stats.live_count, 1);
        assert_eq!(stats.offline_count, 2);
    }

    #[test]
    fn test_empty_batch_is_all_zero() {
        let stats = ProbeStats::from_results(&Vec::<ProbeResult>::new());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.success_rate, 0.0);
        assert_eq!(stats.average_latency_ms, 0.0);
    }

    #[test]
    fn test_all_failed_average_latency_is_zero() {
        let stats = ProbeStats::from_results(&[failed("a", 100.0), failed("b", 200.0)]);
        assert_eq!(stats.success_rate, 0.0);
        assert_eq!(stats.average_latency_ms, 0.0);
    }

    #[test]
    fn test_timeout_and_live_scenario() {
        let results = vec![failed("a", 15_000.0), ok("b", true, 120.456)];
        let stats = ProbeStats::from_results(&results);

        assert_eq!(stats.success_count, 1);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.success_rate, 50.0);
        assert_eq!(stats.average_latency_ms, 120.46);
        assert_eq!(stats.live_count, 1);
    }

    #[test]
    fn test_match_rate_over_comparable_entries_only() {
        let results = vec![
            ComparisonResult::new("a", ok("a", true, 1.0), ok("a", true, 2.0)),
            ComparisonResult::new("b", ok("b", true, 1.0), ok("b", false, 2.0)),
            ComparisonResult::new("c", failed("c", 1.0), ok("c", true, 2.0)),
            ComparisonResult::new("d", failed("d", 1.0), failed("d", 2.0)),
        ];
        let summary = ComparisonSummary::from_results(Uuid::new_v4(), results);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.match_count, 1);
        assert_eq!(summary.mismatch_count, 1);
        assert_eq!(summary.comparable_count, 2);
        assert_eq!(summary.match_rate, 50.0);
        assert_eq!(summary.primary.success_rate, 50.0);
        assert_eq!(summary.secondary.success_rate, 75.0);
        assert_eq!(summary.secondary.average_latency_ms, 2.0);
    }

    #[test]
    fn test_no_comparable_entries_match_rate_zero() {
        let results = vec![ComparisonResult::new("a", failed("a", 1.0), failed("a", 1.0))];
        let summary = ComparisonSummary::from_results(Uuid::new_v4(), results);
        assert_eq!(summary.comparable_count, 0);
        assert_eq!(summary.match_rate, 0.0);
    }

    #[test]
    fn test_batch_summary_flattens_stats() {
        let summary = ProbeBatchSummary::from_results(Uuid::new_v4(), vec![ok("a", true, 5.0)]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["success_count"], 1);
        assert_eq!(json["results"][0]["identifier"], "a");
    }
}
