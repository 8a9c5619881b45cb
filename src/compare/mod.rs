//! Comparison and aggregation.
//!
//! # Data Flow
//! ```text
//! identifiers
//!     → batch.rs (one at a time, pacing delay between items)
//!     → comparator.rs (primary ∥ secondary, joined) or a single probe
//!     → stats.rs (success/match rates, mean latency)
//!     → ProbeBatchSummary / ComparisonSummary (recomputed per request)
//! ```

pub mod batch;
pub mod comparator;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::BatchRunner;
pub use comparator::{reconcile, Comparator, ComparisonResult};
pub use stats::{ComparisonSummary, ProbeBatchSummary, ProbeStats};
