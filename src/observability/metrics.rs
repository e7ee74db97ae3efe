//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_events_total` (counter): rendered events by type
//! - `relay_rejected_total` (counter): rejected requests by reason
//! - `capture_dropped_total` (counter): events dropped by a full capture queue

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint. Failures are logged, not fatal.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_event(kind: &'static str) {
    counter!("relay_events_total", "type" => kind).increment(1);
}

pub fn record_rejected(reason: &'static str) {
    counter!("relay_rejected_total", "reason" => reason).increment(1);
}

pub fn record_capture_dropped() {
    counter!("capture_dropped_total").increment(1);
}
