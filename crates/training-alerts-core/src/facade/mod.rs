//! Public entry point for the dashboard.
//!
//! [`AlertQueryFacade`] owns the collaborators, the initialized engine and
//! the single-slot cache. Table-level helpers (masks, row integration,
//! pattern validation) operate on [`AlertTableRow`](crate::types::AlertTableRow)s.

mod display;
mod engine;
mod masks;
mod patterns;
mod report;
mod service;
#[cfg(test)]
mod tests;

pub use display::{apply_default_alert_values, apply_unified_alerts, ALERT_SERVICE_UNAVAILABLE};
pub use masks::{category_mask, matches_filter, threshold_mask, THRESHOLD_MARKER};
pub use patterns::{validate_alert_patterns, AlertPatternReport, ColumnQuality, ThresholdPatterns};
pub use report::{AlertSummary, CategoryCounts, UNKNOWN_BUCKET};
pub use service::AlertQueryFacade;
