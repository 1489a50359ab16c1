//! The cache slot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::metrics::CacheMetrics;
use crate::error::CoreResult;
use crate::types::UnifiedAlertMap;

#[derive(Debug)]
struct CachedAlerts {
    alerts: Arc<UnifiedAlertMap>,
    generation: u64,
}

/// One optional cached full-population result.
///
/// The last completed fill wins. Readers get a shared `Arc` snapshot that
/// stays valid after the slot is cleared or refilled.
///
/// # Thread Safety
///
/// The slot is guarded by a `parking_lot::Mutex` held across the compute in
/// [`get_or_compute`](Self::get_or_compute) and [`recompute`](Self::recompute),
/// so concurrent callers on an empty slot compute once. A clear through
/// [`invalidate_with`](Self::invalidate_with) cannot interleave with a fill.
#[derive(Debug, Default)]
pub struct AlertCache {
    slot: Mutex<Option<CachedAlerts>>,
    next_generation: AtomicU64,
    metrics: CacheMetrics,
}

impl AlertCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached map, if populated. Counts as a hit or miss.
    pub fn get(&self) -> Option<Arc<UnifiedAlertMap>> {
        let slot = self.slot.lock();
        match slot.as_ref() {
            Some(cached) => {
                self.metrics.record_hit();
                Some(Arc::clone(&cached.alerts))
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Return the cached map, or compute, store and return it.
    ///
    /// A failed compute leaves the slot empty.
    pub fn get_or_compute<F>(&self, compute: F) -> CoreResult<Arc<UnifiedAlertMap>>
    where
        F: FnOnce() -> CoreResult<UnifiedAlertMap>,
    {
        let mut slot = self.slot.lock();
        if let Some(cached) = slot.as_ref() {
            self.metrics.record_hit();
            debug!(generation = cached.generation, "Unified alert cache hit");
            return Ok(Arc::clone(&cached.alerts));
        }

        self.metrics.record_miss();
        let alerts = Arc::new(compute()?);
        let generation = self.fill(&mut slot, Arc::clone(&alerts));
        debug!(generation, subjects = alerts.len(), "Unified alert cache filled");
        Ok(alerts)
    }

    /// Compute under the slot lock and overwrite the slot with the result.
    ///
    /// A failed compute leaves the previous contents in place.
    pub fn recompute<F>(&self, compute: F) -> CoreResult<Arc<UnifiedAlertMap>>
    where
        F: FnOnce() -> CoreResult<UnifiedAlertMap>,
    {
        let mut slot = self.slot.lock();
        let alerts = Arc::new(compute()?);
        let generation = self.fill(&mut slot, Arc::clone(&alerts));
        debug!(generation, subjects = alerts.len(), "Unified alert cache refreshed");
        Ok(alerts)
    }

    /// Overwrite the slot with a freshly computed map.
    pub fn store(&self, alerts: UnifiedAlertMap) -> Arc<UnifiedAlertMap> {
        let alerts = Arc::new(alerts);
        let mut slot = self.slot.lock();
        self.fill(&mut slot, Arc::clone(&alerts));
        alerts
    }

    /// Clear the slot. Returns true if it was populated.
    pub fn invalidate(&self) -> bool {
        let cleared = self.slot.lock().take().is_some();
        if cleared {
            self.metrics.record_invalidation();
            debug!("Unified alert cache invalidated");
        }
        cleared
    }

    /// Run `update` and clear the slot under one lock acquisition.
    ///
    /// Fills that start after this returns observe whatever `update` changed.
    pub fn invalidate_with<R>(&self, update: impl FnOnce() -> R) -> R {
        let mut slot = self.slot.lock();
        let result = update();
        if slot.take().is_some() {
            self.metrics.record_invalidation();
            debug!("Unified alert cache invalidated");
        }
        result
    }

    pub fn is_populated(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Generation of the current contents; increases with every fill.
    pub fn generation(&self) -> Option<u64> {
        self.slot.lock().as_ref().map(|cached| cached.generation)
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    fn fill(&self, slot: &mut Option<CachedAlerts>, alerts: Arc<UnifiedAlertMap>) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        *slot = Some(CachedAlerts { alerts, generation });
        self.metrics.record_fill();
        generation
    }
}
