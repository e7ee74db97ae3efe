//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay
//! and the capture side. All types derive Serde traits for deserialization
//! from config files.

use serde::{Deserialize, Serialize};
use url::Url;

/// Default endpoint path shared by capture sessions and the relay.
pub const DEFAULT_ENDPOINT: &str = "/__log";

/// Default body cap for one event, in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1_000_000;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, connection limit).
    pub listener: ListenerConfig,

    /// Ingestion endpoint settings.
    pub relay: IngestConfig,

    /// Terminal rendering settings.
    pub render: RenderConfig,

    /// Capture-side settings, used by clients shipping events here.
    pub capture: CaptureConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl RelayConfig {
    /// Move the ingestion endpoint on both sides.
    ///
    /// The capture URL keeps its scheme, host and port; only the path is
    /// replaced. An unparsable capture URL is left for validation to report.
    pub fn set_endpoint(&mut self, path: &str) {
        self.relay.endpoint = path.to_string();
        if let Ok(mut url) = Url::parse(&self.capture.endpoint_url) {
            url.set_path(path);
            self.capture.endpoint_url = url.to_string();
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:5174").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5174".to_string(),
            max_connections: 256,
        }
    }
}

/// Relay ingestion settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Path events are posted to. Must match the capture side.
    pub endpoint: String,

    /// Hard cap on one request body; larger bodies abort the connection.
    pub max_body_bytes: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Renderer settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Emit ANSI colors.
    pub color: bool,

    /// Print the page URL after the timestamp.
    pub show_url: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_url: false,
        }
    }
}

/// Capture session settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Full URL of the relay endpoint.
    pub endpoint_url: String,

    /// Pending events kept before the oldest is dropped.
    pub queue_capacity: usize,

    /// Per-request timeout for the transport, in milliseconds.
    pub request_timeout_ms: u64,

    /// Reported as `ua` on every event.
    pub user_agent: Option<String>,

    /// Reported as `url` on every event.
    pub page_url: Option<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            endpoint_url: format!("http://127.0.0.1:5174{DEFAULT_ENDPOINT}"),
            queue_capacity: 1024,
            request_timeout_ms: 5_000,
            user_agent: Some(concat!("console-relay/", env!("CARGO_PKG_VERSION")).to_string()),
            page_url: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
