//! In-memory probe for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::probe::{LiveProbe, ProbeResult, ProbeSource};

#[derive(Clone)]
enum Scripted {
    Live(bool),
    Fail(String),
}

/// Answers from a fixed script; unknown identifiers are offline.
#[derive(Clone)]
pub struct ScriptedProbe {
    source: ProbeSource,
    answers: HashMap<String, Scripted>,
    delay: Duration,
    calls: Arc<Mutex<Vec<(String, Instant)>>>,
}

impl ScriptedProbe {
    pub fn new(source: ProbeSource) -> Self {
        Self {
            source,
            answers: HashMap::new(),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn live(mut self, identifier: &str, is_live: bool) -> Self {
        self.answers.insert(identifier.to_string(), Scripted::Live(is_live));
        self
    }

    pub fn fail(mut self, identifier: &str, error: &str) -> Self {
        self.answers
            .insert(identifier.to_string(), Scripted::Fail(error.to_string()));
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Identifiers probed so far with their start time.
    pub fn calls(&self) -> Vec<(String, Instant)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LiveProbe for ScriptedProbe {
    fn source(&self) -> ProbeSource {
        self.source
    }

    async fn probe(&self, identifier: &str) -> ProbeResult {
        let start = Instant::now();
        self.calls
            .lock()
            .unwrap()
            .push((identifier.to_string(), start));

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0 + 1.0;

        match self.answers.get(identifier) {
            Some(Scripted::Fail(error)) => ProbeResult::failed(identifier, latency_ms, error),
            Some(Scripted::Live(is_live)) => ProbeResult::live(identifier, *is_live, latency_ms),
            None => ProbeResult::live(identifier, false, latency_ms),
        }
    }
}
