//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, optional Prometheus endpoint)
//! ```
//!
//! # Design Decisions
//! - The relay's own diagnostics go through tracing, never through the
//!   renderer's output sink
//! - Metrics are cheap (atomic increments) and recorded even without exporter

pub mod logging;
pub mod metrics;
