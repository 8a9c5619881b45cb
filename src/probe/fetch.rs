//! Shared request/decode path for HTTP-backed probes.

use std::time::{Duration, Instant};

use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tokio::time;

use crate::probe::payload::LivePayload;
use crate::probe::types::{ProbeError, ProbeResult, ProbeSource};

/// Longest upstream body echoed back in an error message.
const MAX_ERROR_BODY: usize = 512;

/// A probe result together with what the upstream actually returned.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    #[serde(flatten)]
    pub result: ProbeResult,
    pub status_code: Option<u16>,
    pub matched_field: Option<String>,
    pub raw: Option<Value>,
}

impl ProbeReport {
    pub fn failed(identifier: &str, latency_ms: f64, status_code: Option<u16>, error: ProbeError) -> Self {
        Self {
            result: ProbeResult::failed(identifier, latency_ms, error),
            status_code,
            matched_field: None,
            raw: None,
        }
    }
}

/// Send `request`, read the full body, and give up after `timeout`.
pub(crate) async fn send_with_timeout(
    request: RequestBuilder,
    timeout: Duration,
) -> Result<(StatusCode, String), ProbeError> {
    let exchange = async {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok::<_, ProbeError>((status, body))
    };

    match time::timeout(timeout, exchange).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout(timeout.as_millis() as u64)),
    }
}

/// Turn a 200 body into a report via the detection table.
pub(crate) fn decode_body(
    source: ProbeSource,
    identifier: &str,
    status: StatusCode,
    body: &str,
    latency_ms: f64,
) -> ProbeReport {
    let raw: Value = match serde_json::from_str(body) {
        Ok(raw) => raw,
        Err(e) => {
            return ProbeReport::failed(
                identifier,
                latency_ms,
                Some(status.as_u16()),
                ProbeError::InvalidResponse(e.to_string()),
            )
        }
    };

    let detection = LivePayload::from_value(&raw).detect();
    match &detection.matched_field {
        Some(field) => tracing::debug!(
            source = %source,
            identifier = %identifier,
            field = %field,
            "Live indicator matched"
        ),
        None => tracing::debug!(
            source = %source,
            identifier = %identifier,
            "No live indicator present"
        ),
    }

    ProbeReport {
        result: ProbeResult::live(identifier, detection.is_live, latency_ms),
        status_code: Some(status.as_u16()),
        matched_field: detection.matched_field,
        raw: Some(raw),
    }
}

pub(crate) fn status_error(status: StatusCode, body: &str) -> ProbeError {
    ProbeError::Status {
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY).collect(),
    }
}

pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_non_json_is_invalid_response() {
        let report = decode_body(ProbeSource::Primary, "a", StatusCode::OK, "<html>", 5.0);
        assert!(!report.result.succeeded);
        assert!(report
            .result
            .error
            .as_deref()
            .unwrap()
            .starts_with("invalid response"));
        assert_eq!(report.status_code, Some(200));
    }

    #[test]
    fn test_decode_reports_matched_field() {
        let report = decode_body(
            ProbeSource::Primary,
            "a",
            StatusCode::OK,
            r#"{"userInfo":{"user":{"roomId":"99"}}}"#,
            5.0,
        );
        assert_eq!(report.result.is_live, Some(true));
        assert_eq!(report.matched_field.as_deref(), Some("userInfo.user.roomId"));
        assert!(report.raw.is_some());
    }

    #[test]
    fn test_status_error_truncates_body() {
        let body = "x".repeat(2_000);
        match status_error(StatusCode::BAD_GATEWAY, &body) {
            ProbeError::Status { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body.len(), MAX_ERROR_BODY);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
