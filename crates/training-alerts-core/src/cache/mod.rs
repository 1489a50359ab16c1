//! Single-slot cache for the full-population unified-alert map.

mod metrics;
mod slot;

pub use metrics::{CacheMetrics, CacheMetricsSnapshot};
pub use slot::AlertCache;
