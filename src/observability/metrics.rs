//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define probe and batch metrics
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `livecheck_probe_total` (counter): probes by source and outcome
//! - `livecheck_probe_duration_seconds` (histogram): probe latency by source
//! - `livecheck_batch_total` (counter): batches by kind
//! - `livecheck_batch_items_total` (counter): identifiers processed by kind
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Labels for source and outcome only; identifiers are unbounded

use std::net::SocketAddr;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::probe::{ProbeResult, ProbeSource};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe(source: ProbeSource, result: &ProbeResult) {
    let outcome = match (result.succeeded, result.is_live) {
        (true, Some(true)) => "live",
        (true, _) => "offline",
        (false, _) => "failed",
    };
    counter!(
        "livecheck_probe_total",
        "source" => source.label(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("livecheck_probe_duration_seconds", "source" => source.label())
        .record(result.latency_ms / 1000.0);
}

pub fn record_batch(kind: &'static str, items: usize) {
    counter!("livecheck_batch_total", "kind" => kind).increment(1);
    counter!("livecheck_batch_items_total", "kind" => kind).increment(items as u64);
}
