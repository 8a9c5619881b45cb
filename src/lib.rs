//! Live-status test service library.
//!
//! Checks whether a user is currently live-streaming against one or two
//! independent data sources, compares their answers, and aggregates
//! success, match and latency statistics over paced batches.

pub mod compare;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod report;
pub mod script;

pub use compare::{BatchRunner, Comparator, ComparisonResult, ComparisonSummary, ProbeBatchSummary};
pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use probe::{LiveProbe, ProbeResult, ProbeSource};
