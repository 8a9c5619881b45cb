//! Route handlers.
//!
//! Handlers only map paths and bodies onto probes, the comparator and the
//! batch runner; every probe failure is reported inline.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::compare::{ComparisonResult, ComparisonSummary, ProbeBatchSummary};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::probe::{LiveProbe, ProbeReport, ProbeResult};

/// Body of the bulk endpoints.
#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    #[serde(alias = "usernames")]
    pub identifiers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub test_single: &'static str,
    pub test_bulk: &'static str,
    pub compare_single: &'static str,
    pub compare_bulk: &'static str,
    pub debug: &'static str,
    pub health: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub primary_configured: bool,
    pub secondary_available: bool,
    pub batch_pacing_ms: u64,
    pub max_identifiers: usize,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct SingleProbeResponse {
    #[serde(flatten)]
    pub result: ProbeResult,
    pub tested_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BulkProbeResponse {
    #[serde(flatten)]
    pub summary: ProbeBatchSummary,
    pub success_rate_display: String,
}

#[derive(Debug, Serialize)]
pub struct DebugResponse {
    #[serde(flatten)]
    pub report: ProbeReport,
    pub tested_at: DateTime<Utc>,
}

pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Live status test service",
        version: env!("CARGO_PKG_VERSION"),
        primary_configured: state.primary.is_some(),
        secondary_available: state.secondary.is_available(),
        batch_pacing_ms: state.batch.pacing().as_millis() as u64,
        max_identifiers: state.config.batch.max_identifiers,
        endpoints: Endpoints {
            test_single: "/test/{identifier}",
            test_bulk: "/test/bulk",
            compare_single: "/compare/{identifier}",
            compare_bulk: "/compare/bulk",
            debug: "/debug/{identifier}",
            health: "/health",
        },
    })
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn test_single(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<SingleProbeResponse>, ApiError> {
    let probe = state.primary()?;
    let identifier = clean_identifier(&identifier)?;
    tracing::info!(identifier = %identifier, "Single probe");

    let result = probe.probe(&identifier).await;
    Ok(Json(SingleProbeResponse {
        result,
        tested_at: Utc::now(),
    }))
}

pub async fn test_bulk(
    State(state): State<AppState>,
    Json(request): Json<BulkRequest>,
) -> Result<Json<BulkProbeResponse>, ApiError> {
    let probe = state.primary()?;
    let identifiers = state.check_bulk(&request.identifiers)?;

    let summary = state.batch.run_probes(probe.as_ref(), &identifiers).await;
    let success_rate_display = summary.stats.success_rate_display();
    Ok(Json(BulkProbeResponse {
        summary,
        success_rate_display,
    }))
}

pub async fn compare_single(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<ComparisonResult>, ApiError> {
    let comparator = state.comparator()?;
    let identifier = clean_identifier(&identifier)?;
    tracing::info!(identifier = %identifier, "Single comparison");

    Ok(Json(comparator.compare(&identifier).await))
}

pub async fn compare_bulk(
    State(state): State<AppState>,
    Json(request): Json<BulkRequest>,
) -> Result<Json<ComparisonSummary>, ApiError> {
    let comparator = state.comparator()?;
    let identifiers = state.check_bulk(&request.identifiers)?;

    Ok(Json(state.batch.run_comparisons(&comparator, &identifiers).await))
}

pub async fn debug_single(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<DebugResponse>, ApiError> {
    let probe = state.primary()?;
    let identifier = clean_identifier(&identifier)?;
    tracing::info!(identifier = %identifier, "Debug probe");

    let report = probe.inspect(&identifier).await;
    Ok(Json(DebugResponse {
        report,
        tested_at: Utc::now(),
    }))
}

fn clean_identifier(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(ApiError::EmptyIdentifier)
    } else {
        Ok(trimmed.to_string())
    }
}
