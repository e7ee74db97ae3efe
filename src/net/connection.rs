//! Live-connection accounting for the relay.
//!
//! # Responsibilities
//! - Number connections per server for log correlation
//! - Count connections still being served
//! - Let shutdown wait until the count reaches zero

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Counters {
    live: AtomicU64,
    next_id: AtomicU64,
    idle: Notify,
}

/// Shared by the accept loop and every connection task.
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    counters: Arc<Counters>,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection from `peer`; dropping the guard unregisters it.
    pub fn track(&self, peer: SocketAddr) -> ConnectionGuard {
        self.counters.live.fetch_add(1, Ordering::SeqCst);
        ConnectionGuard {
            counters: Arc::clone(&self.counters),
            id: self.counters.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            peer,
            opened: Instant::now(),
        }
    }

    pub fn live(&self) -> u64 {
        self.counters.live.load(Ordering::SeqCst)
    }

    /// Wait until no connection is live, giving up after `deadline`.
    /// Returns whether the tracker drained.
    pub async fn wait_idle(&self, deadline: Duration) -> bool {
        let drained = async {
            loop {
                let notified = self.counters.idle.notified();
                if self.live() == 0 {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(deadline, drained).await.is_ok()
    }
}

/// One served connection.
#[derive(Debug)]
pub struct ConnectionGuard {
    counters: Arc<Counters>,
    id: u64,
    peer: SocketAddr,
    opened: Instant,
}

impl ConnectionGuard {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if self.counters.live.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.counters.idle.notify_waiters();
        }
        tracing::trace!(
            connection = self.id,
            peer_addr = %self.peer,
            elapsed_ms = self.opened.elapsed().as_millis() as u64,
            "Connection closed"
        );
    }
}
