//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Probes, batches and HTTP handlers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID attached to every HTTP span
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
