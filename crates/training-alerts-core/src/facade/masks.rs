//! Row masks behind category filtering and aggregation.

use crate::types::{AlertCategory, AlertFlag, AlertTableRow, CategoryFilter};

/// Marker a per-metric annotation carries when its rule fired.
pub const THRESHOLD_MARKER: &str = "T |";

/// True when the aggregate flag is `T` or any per-metric annotation
/// carries the `"T |"` marker.
///
/// Reads the raw table text, not the unified category.
pub fn threshold_mask(row: &AlertTableRow) -> bool {
    row.threshold_alert.as_deref() == Some(AlertFlag::Triggered.as_str())
        || row
            .metric_annotations()
            .iter()
            .flatten()
            .any(|annotation| annotation.contains(THRESHOLD_MARKER))
}

/// True when the row's resolved category is `category`.
pub fn category_mask(row: &AlertTableRow, category: AlertCategory) -> bool {
    row.percentile_category.as_deref() == Some(category.as_str())
}

pub fn matches_filter(row: &AlertTableRow, filter: CategoryFilter) -> bool {
    match filter {
        CategoryFilter::All => true,
        CategoryFilter::Threshold => threshold_mask(row),
        CategoryFilter::Category(category) => category_mask(row, category),
    }
}
