//! Cache hit/miss counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Thread-safe cache counters.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    /// Unscoped reads served from the slot.
    pub hits: AtomicU64,
    /// Unscoped reads that had to compute.
    pub misses: AtomicU64,
    /// Times the slot was written.
    pub fills: AtomicU64,
    /// Times the slot was cleared while populated.
    pub invalidations: AtomicU64,
}

/// Point-in-time copy of [`CacheMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheMetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub fills: u64,
    pub invalidations: u64,
}

impl CacheMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fill(&self) {
        self.fills.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            fills: self.fills.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }

    /// Hits over total lookups; 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let snapshot = self.snapshot();
        let total = snapshot.hits + snapshot.misses;
        if total == 0 {
            0.0
        } else {
            snapshot.hits as f64 / total as f64
        }
    }
}
