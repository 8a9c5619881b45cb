//! Null-object probe used when a source is switched off.

use async_trait::async_trait;

use crate::observability::metrics;
use crate::probe::types::{ProbeError, ProbeResult, ProbeSource};
use crate::probe::LiveProbe;

pub const UNAVAILABLE_MESSAGE: &str = "secondary source not available";

/// Answers every probe with a fixed failure, without any I/O.
#[derive(Debug, Clone, Copy)]
pub struct UnavailableProbe {
    source: ProbeSource,
}

impl UnavailableProbe {
    pub fn new(source: ProbeSource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl LiveProbe for UnavailableProbe {
    fn source(&self) -> ProbeSource {
        self.source
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn probe(&self, identifier: &str) -> ProbeResult {
        let result = ProbeResult::failed(identifier, 0.0, ProbeError::Unavailable(UNAVAILABLE_MESSAGE));
        metrics::record_probe(self.source, &result);
        result
    }
}
