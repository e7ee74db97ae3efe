//! Relay listener: accepts posted events and hands them to the renderer.
//!
//! # Data Flow
//! ```text
//! POST {endpoint}
//!     → path / method checks (404 / 405)
//!     → Content-Length pre-check, then body.rs (capped read)
//!     → validate.rs (structural checks, typed event)
//!     → Renderer
//!     → 204, whether the payload was rendered or rejected as invalid
//! ```
//!
//! # Design Decisions
//! - An oversized body is an error, not a response: the standalone server
//!   aborts the connection, the mounted router answers 413 and closes
//! - Invalid payloads are logged through tracing and never reach the
//!   renderer's sink
//! - Rendering is synchronous so no output lock is ever held across an await

pub mod body;
pub mod server;
pub mod stats;
pub mod validate;

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::config::IngestConfig;
use crate::observability::metrics;
use crate::render::Renderer;

pub use body::{declared_length, read_capped};
pub use server::RelayServer;
pub use stats::{RelayStats, StatsSnapshot};
pub use validate::{parse_event, PayloadError};

/// Failures that end a request without a regular response.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("payload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            RelayError::PayloadTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                [(header::CONNECTION, HeaderValue::from_static("close"))],
            )
                .into_response(),
            RelayError::Body(_) => StatusCode::BAD_REQUEST.into_response(),
        }
    }
}

/// Request handler shared by the standalone server and the mounted router.
pub struct Relay {
    endpoint: String,
    max_body_bytes: usize,
    renderer: Renderer,
    stats: RelayStats,
}

impl Relay {
    pub fn new(config: &IngestConfig, renderer: Renderer) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            max_body_bytes: config.max_body_bytes,
            renderer,
            stats: RelayStats::default(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    pub fn stats(&self) -> &RelayStats {
        &self.stats
    }

    /// Handle one request.
    ///
    /// Returns `Err` only when the body exceeded the cap or could not be read;
    /// the caller decides how the connection ends.
    pub async fn handle(&self, request: Request<Body>) -> Result<Response, RelayError> {
        if request.uri().path() != self.endpoint {
            self.stats.not_found();
            metrics::record_rejected("not_found");
            return Ok(status(StatusCode::NOT_FOUND));
        }

        if *request.method() != Method::POST {
            self.stats.method_rejected();
            metrics::record_rejected("method");
            return Ok(status(StatusCode::METHOD_NOT_ALLOWED));
        }

        if let Some(declared) = declared_length(request.headers()) {
            if declared > self.max_body_bytes as u64 {
                tracing::warn!(
                    declared,
                    limit = self.max_body_bytes,
                    "Rejecting oversized payload before reading"
                );
                return Err(self.oversized());
            }
        }

        let bytes = match read_capped(request.into_body(), self.max_body_bytes).await {
            Ok(bytes) => bytes,
            Err(RelayError::PayloadTooLarge { .. }) => {
                tracing::warn!(limit = self.max_body_bytes, "Payload exceeded limit while reading");
                return Err(self.oversized());
            }
            Err(e) => {
                tracing::debug!(error = %e, "Body read failed");
                return Err(e);
            }
        };

        self.ingest(&bytes);
        Ok(status(StatusCode::NO_CONTENT))
    }

    /// Validate and render one complete body.
    pub fn ingest(&self, bytes: &[u8]) {
        match parse_event(bytes) {
            Ok(event) => {
                self.stats.accepted();
                metrics::record_event(event.kind().as_str());
                if let Err(e) = self.renderer.render(&event) {
                    tracing::error!(error = %e, "Failed to write rendered event");
                }
            }
            Err(e) => {
                self.stats.invalid();
                metrics::record_rejected("invalid");
                tracing::warn!(error = %e, bytes = bytes.len(), "Invalid payload");
            }
        }
    }

    /// Router that serves only the configured endpoint, for embedding in a
    /// host application.
    pub fn router(self: Arc<Self>) -> Router {
        let endpoint = self.endpoint.clone();
        Router::new()
            .route(&endpoint, any(mounted_handler))
            .with_state(self)
            .layer(TraceLayer::new_for_http())
    }

    fn oversized(&self) -> RelayError {
        self.stats.oversized();
        metrics::record_rejected("oversized");
        RelayError::PayloadTooLarge {
            limit: self.max_body_bytes,
        }
    }
}

async fn mounted_handler(State(relay): State<Arc<Relay>>, request: Request<Body>) -> Response {
    match relay.handle(request).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

fn status(code: StatusCode) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = code;
    response
}
