//! Fire-and-forget delivery of events to the relay.
//!
//! # Design Decisions
//! - One POST per event, JSON body, no retries
//! - Every failure (encoding, connect, timeout, non-2xx) is traced and
//!   discarded; callers get no failure signal
//! - The client is built once per capture session and reuses connections

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use url::Url;

use crate::config::CaptureConfig;
use crate::event::LogEvent;

const KEEPALIVE: Duration = Duration::from_secs(60);

/// Construction failures. Sending never fails visibly.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(config: &CaptureConfig) -> Result<Self, TransportError> {
        let endpoint = Url::parse(&config.endpoint_url)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .tcp_keepalive(KEEPALIVE)
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST one event. Errors are swallowed.
    pub async fn send(&self, event: &LogEvent) {
        let body = match serde_json::to_vec(event) {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(error = %e, kind = %event.kind(), "Dropping unencodable event");
                return;
            }
        };

        let result = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;

        match result {
            Ok(response) => {
                tracing::trace!(
                    status = %response.status(),
                    kind = %event.kind(),
                    "Event delivered"
                );
            }
            Err(e) => {
                tracing::debug!(endpoint = %self.endpoint, error = %e, "Event delivery failed");
            }
        }
    }
}
