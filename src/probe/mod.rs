//! Live-status probes.
//!
//! # Data Flow
//! ```text
//! identifier
//!     → LiveProbe::probe (one outbound request, bounded by a timeout)
//!     → fetch.rs (status + body)
//!     → payload.rs (partial record → detection table)
//!     → ProbeResult (never an Err; failures are inline)
//! ```
//!
//! # Design Decisions
//! - Which secondary implementation runs is decided once, at startup
//! - Failures are values, not errors: a probe never propagates past its boundary
//! - No retries anywhere

pub mod api;
pub mod fetch;
pub mod payload;
pub mod room;
pub mod types;
pub mod unavailable;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::SecondarySourceConfig;

pub use api::ApiProbe;
pub use fetch::ProbeReport;
pub use payload::{Detection, LivePayload};
pub use room::RoomProbe;
pub use types::{ProbeError, ProbeResult, ProbeSource};
pub use unavailable::UnavailableProbe;

/// A single data source able to tell whether a user is live.
#[async_trait]
pub trait LiveProbe: Send + Sync {
    fn source(&self) -> ProbeSource;

    /// False for null-object implementations.
    fn is_available(&self) -> bool {
        true
    }

    async fn probe(&self, identifier: &str) -> ProbeResult;
}

/// Pick the Source B implementation from configuration.
pub fn build_secondary(config: &SecondarySourceConfig) -> Arc<dyn LiveProbe> {
    if config.enabled {
        tracing::info!(base_url = %config.base_url, "Secondary source enabled");
        Arc::new(RoomProbe::from_config(config))
    } else {
        tracing::info!("Secondary source disabled");
        Arc::new(UnavailableProbe::new(ProbeSource::Secondary))
    }
}
