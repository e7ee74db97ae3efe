//! Capture session: wraps a console host and ships every call to the relay.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::console::{ConsoleHost, LogFn};
use super::queue::EventQueue;
use crate::config::CaptureConfig;
use crate::event::{build_event, CaptureContext, ConsoleMethod, LogEvent};
use crate::transport::{HttpTransport, TransportError};
use crate::value::Value;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture sessions must be installed from within a tokio runtime")]
    NoRuntime,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Handle to an installed capture session. Clones share the session.
///
/// Dropping the last handle uninstalls the wrappers and lets the worker
/// finish what is already queued.
#[derive(Clone)]
pub struct CaptureSession {
    inner: Arc<SessionInner>,
}

pub(crate) struct SessionInner {
    id: Uuid,
    host: ConsoleHost,
    originals: [LogFn; 6],
    queue: Arc<EventQueue<LogEvent>>,
    seq: AtomicU64,
    installed: AtomicBool,
    user_agent: Option<String>,
    page_url: Option<String>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl CaptureSession {
    /// Wrap every entry point of `host`.
    ///
    /// Installing on a host that already has an active session returns that
    /// session; entry points are never wrapped twice.
    pub fn install(host: &ConsoleHost, config: &CaptureConfig) -> Result<Self, CaptureError> {
        let mut active = host.active();
        if let Some(inner) = active.upgrade() {
            if inner.installed.load(Ordering::SeqCst) {
                tracing::debug!(session = %inner.id, "Capture already installed");
                return Ok(Self { inner });
            }
        }

        let runtime = Handle::try_current().map_err(|_| CaptureError::NoRuntime)?;
        let transport = HttpTransport::new(config)?;
        let queue = Arc::new(EventQueue::new(config.queue_capacity));

        let inner = Arc::new(SessionInner {
            id: Uuid::new_v4(),
            host: host.clone(),
            originals: host.snapshot(),
            queue: Arc::clone(&queue),
            seq: AtomicU64::new(0),
            installed: AtomicBool::new(true),
            user_agent: config.user_agent.clone(),
            page_url: config.page_url.clone(),
            worker: Mutex::new(None),
        });

        let wrappers = ConsoleMethod::ALL.map(|method| {
            let original = Arc::clone(&inner.originals[method.index()]);
            let session = Arc::downgrade(&inner);
            Arc::new(move |args: &[Value]| {
                original(args);
                if let Some(session) = session.upgrade() {
                    session.submit(method, args);
                }
            }) as LogFn
        });
        host.replace_all(wrappers);

        let worker = runtime.spawn(async move {
            while let Some(event) = queue.pop().await {
                transport.send(&event).await;
            }
        });
        *inner.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(worker);
        *active = Arc::downgrade(&inner);

        tracing::info!(
            session = %inner.id,
            endpoint = %config.endpoint_url,
            queue_capacity = config.queue_capacity,
            "Capture installed"
        );
        Ok(Self { inner })
    }

    /// Queue one call without touching the host's entry points.
    pub fn submit(&self, method: ConsoleMethod, args: &[Value]) {
        self.inner.submit(method, args);
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn is_installed(&self) -> bool {
        self.inner.installed.load(Ordering::SeqCst)
    }

    /// Events waiting for the worker.
    pub fn pending(&self) -> usize {
        self.inner.queue.len()
    }

    /// Events discarded because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.inner.queue.dropped()
    }

    /// Restore the original entry points and stop accepting events.
    pub fn uninstall(&self) {
        self.inner.uninstall();
    }

    /// Uninstall, then wait until every queued event has been sent.
    pub async fn shutdown(self) {
        self.inner.uninstall();
        let worker = self
            .inner
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                tracing::warn!(session = %self.inner.id, error = %e, "Capture worker failed");
            }
        }
        tracing::debug!(session = %self.inner.id, "Capture drained");
    }
}

impl SessionInner {
    fn submit(&self, method: ConsoleMethod, args: &[Value]) {
        if !self.installed.load(Ordering::SeqCst) {
            return;
        }
        let ctx = CaptureContext {
            captured_at: Utc::now(),
            user_agent: self.user_agent.clone(),
            page_url: self.page_url.clone(),
            seq: Some(self.seq.fetch_add(1, Ordering::SeqCst)),
            session: Some(self.id),
        };
        self.queue.push(build_event(method, args, &ctx));
    }

    fn uninstall(&self) {
        if self.installed.swap(false, Ordering::SeqCst) {
            self.host.replace_all(self.originals.clone());
            tracing::info!(session = %self.id, "Capture uninstalled");
        }
        self.queue.close();
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        self.uninstall();
    }
}
