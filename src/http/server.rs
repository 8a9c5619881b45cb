//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS, timeout on single-identifier routes)
//! - Build probes once at startup and share them through state
//! - Serve until the shutdown channel fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::compare::{BatchRunner, Comparator};
use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::http::response::ApiError;
use crate::probe::{build_secondary, ApiProbe, LiveProbe};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    /// `None` while no API key is configured.
    pub primary: Option<Arc<ApiProbe>>,
    pub secondary: Arc<dyn LiveProbe>,
    pub batch: BatchRunner,
}

impl AppState {
    pub fn from_config(config: ServiceConfig) -> Self {
        let primary = ApiProbe::from_config(&config.primary).map(Arc::new);
        if primary.is_none() {
            tracing::warn!("No API key configured; probe endpoints will return 500");
        }
        let secondary = build_secondary(&config.secondary);
        let batch = BatchRunner::from_config(&config.batch);

        Self {
            config: Arc::new(config),
            primary,
            secondary,
            batch,
        }
    }

    pub fn primary(&self) -> Result<Arc<ApiProbe>, ApiError> {
        self.primary.clone().ok_or(ApiError::MissingApiKey)
    }

    pub fn comparator(&self) -> Result<Comparator, ApiError> {
        let primary: Arc<dyn LiveProbe> = self.primary()?;
        Ok(Comparator::new(primary, self.secondary.clone()))
    }

    /// Trim and bound a bulk request. Blank entries stay in place and are
    /// reported as failures by the batch runner.
    pub fn check_bulk(&self, identifiers: &[String]) -> Result<Vec<String>, ApiError> {
        let max = self.config.batch.max_identifiers;
        if identifiers.len() > max {
            return Err(ApiError::TooManyIdentifiers {
                count: identifiers.len(),
                max,
            });
        }
        Ok(identifiers.iter().map(|id| id.trim().to_string()).collect())
    }
}

/// HTTP server for the live-status service.
pub struct HttpServer {
    router: Router,
    config: Arc<ServiceConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_state(AppState::from_config(config))
    }

    /// Create a server around prebuilt state.
    pub fn with_state(state: AppState) -> Self {
        let config = state.config.clone();
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        // Bulk routes sit outside the request timeout; per-probe timeouts
        // and the identifier limit bound them.
        let bulk = Router::new()
            .route("/test/bulk", post(handlers::test_bulk))
            .route("/compare/bulk", post(handlers::compare_bulk));

        Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(handlers::health))
            .route("/test/{identifier}", get(handlers::test_single))
            .route("/compare/{identifier}", get(handlers::compare_single))
            .route("/debug/{identifier}", get(handlers::debug_single))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .merge(bulk)
            .with_state(state)
            .layer(cors)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| request_span(request)))
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            primary_configured = self.config.primary.api_key.is_some(),
            secondary_enabled = self.config.secondary.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn config_without_key() -> ServiceConfig {
        let mut config = ServiceConfig::default();
        config.primary.api_key = None;
        config.secondary.enabled = false;
        config
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value, Option<String>) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let request_id = response
            .headers()
            .get("x-request-id")
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json, request_id)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_root_reports_capabilities() {
        let server = HttpServer::new(config_without_key());
        let (status, json, request_id) = send(server.router(), get_req("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["primary_configured"], false);
        assert_eq!(json["secondary_available"], false);
        assert_eq!(json["batch_pacing_ms"], 500);
        assert!(request_id.is_some());
    }

    #[tokio::test]
    async fn test_health() {
        let server = HttpServer::new(config_without_key());
        let (status, json, _) = send(server.router(), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_missing_api_key_is_500() {
        let server = HttpServer::new(config_without_key());
        for uri in ["/test/alice", "/compare/alice", "/debug/alice"] {
            let (status, json, _) = send(server.router(), get_req(uri)).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
            assert_eq!(json["detail"], "TIKAPI_KEY not configured");
        }
    }

    #[tokio::test]
    async fn test_bulk_limit_enforced() {
        let mut config = config_without_key();
        config.primary.api_key = Some("k".into());
        config.batch.max_identifiers = 2;
        let server = HttpServer::new(config);

        let request = Request::builder()
            .method("POST")
            .uri("/test/bulk")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"identifiers": ["a", "b", "c"]}"#))
            .unwrap();
        let (status, json, _) = send(server.router(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["detail"], "too many identifiers: 3 (max 2)");
    }

    #[tokio::test]
    async fn test_client_request_id_is_echoed() {
        let server = HttpServer::new(config_without_key());
        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let (_, _, request_id) = send(server.router(), request).await;
        assert_eq!(request_id.as_deref(), Some("abc-123"));
    }
}
