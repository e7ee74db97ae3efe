//! Ingest counters for one relay.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-relay counters. Process-wide totals go to `metrics` as well.
#[derive(Debug, Default)]
pub struct RelayStats {
    accepted: AtomicU64,
    invalid: AtomicU64,
    oversized: AtomicU64,
    method_rejected: AtomicU64,
    not_found: AtomicU64,
}

/// Point-in-time copy of [`RelayStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub accepted: u64,
    pub invalid: u64,
    pub oversized: u64,
    pub method_rejected: u64,
    pub not_found: u64,
}

impl RelayStats {
    pub(crate) fn accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn invalid(&self) {
        self.invalid.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn oversized(&self) {
        self.oversized.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn method_rejected(&self) {
        self.method_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            invalid: self.invalid.load(Ordering::Relaxed),
            oversized: self.oversized.load(Ordering::Relaxed),
            method_rejected: self.method_rejected.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
        }
    }
}
