//! JSON reports written by the standalone batch script.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compare::{ComparisonSummary, ProbeBatchSummary};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Either kind of batch summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "summary", rename_all = "snake_case")]
pub enum ReportSummary {
    Probe(ProbeBatchSummary),
    Compare(ComparisonSummary),
}

/// Everything one script run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptReport {
    pub generated_at: DateTime<Utc>,
    pub iterations: u32,
    pub pacing_ms: u64,
    pub identifiers: Vec<String>,
    #[serde(flatten)]
    pub summary: ReportSummary,
}

impl ScriptReport {
    pub fn new(
        identifiers: Vec<String>,
        iterations: u32,
        pacing_ms: u64,
        summary: ReportSummary,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            iterations,
            pacing_ms,
            identifiers,
            summary,
        }
    }
}

/// Write `report` as pretty JSON, creating parent directories.
pub fn write_report(path: &Path, report: &ScriptReport) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    tracing::info!(path = %path.display(), "Report written");
    Ok(())
}

pub fn read_report(path: &Path) -> Result<ScriptReport, ReportError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
