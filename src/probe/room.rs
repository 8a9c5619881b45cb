//! Source B: the public room endpoint.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::config::SecondarySourceConfig;
use crate::observability::metrics;
use crate::probe::fetch::{decode_body, elapsed_ms, send_with_timeout, status_error};
use crate::probe::types::{ProbeResult, ProbeSource};
use crate::probe::LiveProbe;

const ROOM_PATH: &str = "/api-live/user/room/";
const APP_ID: &str = "1988";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; livecheck/0.1)";

/// Live-status probe backed by the public room endpoint.
#[derive(Clone)]
pub struct RoomProbe {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl RoomProbe {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &SecondarySourceConfig) -> Self {
        Self::new(&config.base_url, Duration::from_millis(config.timeout_ms))
    }
}

#[async_trait]
impl LiveProbe for RoomProbe {
    fn source(&self) -> ProbeSource {
        ProbeSource::Secondary
    }

    async fn probe(&self, identifier: &str) -> ProbeResult {
        let unique_id = identifier.trim_start_matches('@');
        let start = Instant::now();
        let request = self
            .client
            .get(format!("{}{}", self.base_url, ROOM_PATH))
            .query(&[("aid", APP_ID), ("uniqueId", unique_id)])
            .header(reqwest::header::USER_AGENT, USER_AGENT);

        let outcome = send_with_timeout(request, self.timeout).await;
        let latency_ms = elapsed_ms(start);

        let result = match outcome {
            Ok((StatusCode::OK, body)) => {
                decode_body(ProbeSource::Secondary, identifier, StatusCode::OK, &body, latency_ms)
                    .result
            }
            // No room for this user: a definite "offline", not a failure.
            Ok((StatusCode::NOT_FOUND, _)) => ProbeResult::live(identifier, false, latency_ms),
            Ok((status, body)) => ProbeResult::failed(identifier, latency_ms, status_error(status, &body)),
            Err(e) => ProbeResult::failed(identifier, latency_ms, e),
        };

        if let Some(error) = &result.error {
            tracing::warn!(
                source = %ProbeSource::Secondary,
                identifier = %identifier,
                latency_ms = latency_ms,
                error = %error,
                "Probe failed"
            );
        }
        metrics::record_probe(ProbeSource::Secondary, &result);
        result
    }
}
