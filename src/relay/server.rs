//! Standalone relay server.
//!
//! # Responsibilities
//! - Accept connections from the bounded listener
//! - Serve each connection over HTTP/1.1 with the shared [`Relay`]
//! - Stop accepting on shutdown and drain in-flight connections

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::sync::broadcast;

use super::Relay;
use crate::net::{ConnectionTracker, Listener, ListenerError};

/// How long shutdown waits for open connections.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RelayServer {
    relay: Arc<Relay>,
    tracker: ConnectionTracker,
}

impl RelayServer {
    pub fn new(relay: Arc<Relay>) -> Self {
        Self {
            relay,
            tracker: ConnectionTracker::new(),
        }
    }

    /// Serve until `shutdown` fires or the listener closes.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ListenerError> {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(
                address = %addr,
                endpoint = %self.relay.endpoint(),
                max_body_bytes = self.relay.max_body_bytes(),
                "Relay listening"
            );
        }

        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                accepted = listener.accept() => {
                    let (stream, peer, permit) = match accepted {
                        Ok(conn) => conn,
                        Err(ListenerError::Accept(e)) => {
                            tracing::warn!(error = %e, "Accept failed");
                            continue;
                        }
                        Err(e) => return Err(e),
                    };

                    let guard = self.tracker.track(peer);
                    let relay = Arc::clone(&self.relay);

                    tokio::spawn(async move {
                        let _permit = permit;
                        let service = service_fn(move |request: Request<Incoming>| {
                            let relay = Arc::clone(&relay);
                            async move { relay.handle(request.map(Body::new)).await }
                        });

                        if let Err(e) = http1::Builder::new()
                            .serve_connection(TokioIo::new(stream), service)
                            .await
                        {
                            tracing::debug!(
                                connection = guard.id(),
                                peer_addr = %guard.peer(),
                                error = %e,
                                "Connection aborted"
                            );
                        }
                        drop(guard);
                    });
                }
            }
        }

        tracing::info!(
            live = self.tracker.live(),
            "Relay stopped accepting, draining connections"
        );
        if !self.tracker.wait_idle(DRAIN_TIMEOUT).await {
            tracing::warn!(
                live = self.tracker.live(),
                "Connections still open after drain timeout"
            );
        }
        tracing::info!("Relay stopped");
        Ok(())
    }
}
