//! Source A: the commercial data API.
//!
//! # Responsibilities
//! - Query `GET {base}/user/info?username=...` with the API key header
//! - Bound every call by the configured timeout
//! - Report the raw payload and matched field for the debug endpoint

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::config::PrimarySourceConfig;
use crate::observability::metrics;
use crate::probe::fetch::{decode_body, elapsed_ms, send_with_timeout, status_error, ProbeReport};
use crate::probe::types::{ProbeResult, ProbeSource};
use crate::probe::LiveProbe;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// Live-status probe backed by the commercial API.
#[derive(Clone)]
pub struct ApiProbe {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl ApiProbe {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout,
        }
    }

    /// Build from configuration; `None` while no API key is configured.
    pub fn from_config(config: &PrimarySourceConfig) -> Option<Self> {
        let api_key = config.api_key.as_deref()?;
        Some(Self::new(
            &config.base_url,
            api_key,
            Duration::from_millis(config.timeout_ms),
        ))
    }

    /// Probe and keep the upstream status, raw payload and matched field.
    pub async fn inspect(&self, identifier: &str) -> ProbeReport {
        let start = Instant::now();
        let request = self
            .client
            .get(format!("{}/user/info", self.base_url))
            .query(&[("username", identifier)])
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json");

        let outcome = send_with_timeout(request, self.timeout).await;
        let latency_ms = elapsed_ms(start);

        let report = match outcome {
            Ok((StatusCode::OK, body)) => {
                decode_body(ProbeSource::Primary, identifier, StatusCode::OK, &body, latency_ms)
            }
            Ok((status, body)) => ProbeReport::failed(
                identifier,
                latency_ms,
                Some(status.as_u16()),
                status_error(status, &body),
            ),
            Err(e) => ProbeReport::failed(identifier, latency_ms, None, e),
        };

        if let Some(error) = &report.result.error {
            tracing::warn!(
                source = %ProbeSource::Primary,
                identifier = %identifier,
                latency_ms = latency_ms,
                error = %error,
                "Probe failed"
            );
        }
        metrics::record_probe(ProbeSource::Primary, &report.result);
        report
    }
}

#[async_trait]
impl LiveProbe for ApiProbe {
    fn source(&self) -> ProbeSource {
        ProbeSource::Primary
    }

    async fn probe(&self, identifier: &str) -> ProbeResult {
        self.inspect(identifier).await.result
    }
}
