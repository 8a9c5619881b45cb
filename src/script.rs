//! The standalone batch script.
//!
//! # Responsibilities
//! - Build the sources a script run needs from configuration
//! - Repeat the paced batch for every iteration and merge the results
//! - Produce the [`ScriptReport`] that gets saved to disk
//!
//! # Design Decisions
//! - Pacing follows `batch.trailing_delay`; when trailing delays are off,
//!   one pacing delay still separates consecutive iterations

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::compare::{BatchRunner, Comparator, ComparisonSummary, ProbeBatchSummary};
use crate::config::loader::ENV_API_KEY;
use crate::config::ServiceConfig;
use crate::probe::{build_secondary, ApiProbe, LiveProbe};
use crate::report::{ReportSummary, ScriptReport};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("{} is not set; add it to the environment or a .env file", ENV_API_KEY)]
    MissingApiKey,
}

/// What a script run queries.
#[derive(Clone)]
pub enum ScriptMode {
    Probe(Arc<dyn LiveProbe>),
    Compare(Comparator),
}

impl ScriptMode {
    pub fn from_config(config: &ServiceConfig, compare: bool) -> Result<Self, ScriptError> {
        let primary: Arc<dyn LiveProbe> = Arc::new(
            ApiProbe::from_config(&config.primary).ok_or(ScriptError::MissingApiKey)?,
        );
        if compare {
            let secondary = build_secondary(&config.secondary);
            Ok(ScriptMode::Compare(Comparator::new(primary, secondary)))
        } else {
            Ok(ScriptMode::Probe(primary))
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScriptOptions {
    pub identifiers: Vec<String>,
    pub iterations: u32,
    pub pacing_ms: u64,
    pub trailing_delay: bool,
}

impl ScriptOptions {
    /// Defaults from the `script` and `batch` sections.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            identifiers: config.script.default_identifiers.clone(),
            iterations: config.script.iterations,
            pacing_ms: config.script.pacing_ms,
            trailing_delay: config.batch.trailing_delay,
        }
    }

    fn runner(&self) -> BatchRunner {
        BatchRunner::new(Duration::from_millis(self.pacing_ms), self.trailing_delay)
    }
}

/// Run every iteration and merge the results into one report.
pub async fn run_script(mode: &ScriptMode, options: &ScriptOptions) -> ScriptReport {
    let runner = options.runner();
    let iterations = options.iterations.max(1);
    let run_id = Uuid::new_v4();
    tracing::info!(
        run_id = %run_id,
        iterations = iterations,
        count = options.identifiers.len(),
        "Script run starting"
    );

    let summary = match mode {
        ScriptMode::Probe(probe) => {
            let mut results = Vec::new();
            for iteration in 1..=iterations {
                let batch = runner.run_probes(probe.as_ref(), &options.identifiers).await;
                results.extend(batch.results);
                between_iterations(options, iteration, iterations).await;
            }
            ReportSummary::Probe(ProbeBatchSummary::from_results(run_id, results))
        }
        ScriptMode::Compare(comparator) => {
            let mut results = Vec::new();
            for iteration in 1..=iterations {
                let batch = runner.run_comparisons(comparator, &options.identifiers).await;
                results.extend(batch.results);
                between_iterations(options, iteration, iterations).await;
            }
            ReportSummary::Compare(ComparisonSummary::from_results(run_id, results))
        }
    };

    ScriptReport::new(
        options.identifiers.clone(),
        iterations,
        options.pacing_ms,
        summary,
    )
}

async fn between_iterations(options: &ScriptOptions, iteration: u32, iterations: u32) {
    if !options.trailing_delay && options.pacing_ms > 0 && iteration < iterations {
        tokio::time::sleep(Duration::from_millis(options.pacing_ms)).await;
    }
}
