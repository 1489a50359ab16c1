//! Aggregation and summary shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Bucket holding subjects no standard category mask matched.
pub const UNKNOWN_BUCKET: &str = "Unknown";

/// Per-category subject counts for a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    /// Standard categories with a non-zero count, plus `Unknown` for any
    /// shortfall against `total_subjects`.
    pub category_counts: BTreeMap<String, usize>,
    /// Rows matching the threshold mask. Overlaps the categories, so it is
    /// not part of the reconciliation.
    pub threshold_alerts: usize,
    pub total_subjects: usize,
}

impl CategoryCounts {
    /// Sum of `category_counts`.
    pub fn reconciled_total(&self) -> usize {
        self.category_counts.values().sum()
    }

    pub fn count(&self, category: &str) -> usize {
        self.category_counts.get(category).copied().unwrap_or(0)
    }
}

/// Population summary over unified alerts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertSummary {
    pub total_subjects: usize,
    pub category_counts: BTreeMap<String, usize>,
    pub category_percentages: BTreeMap<String, f64>,
    pub categories_found: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AlertSummary {
    /// Zero-total summary carrying an error message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn from_counts(category_counts: BTreeMap<String, usize>) -> Self {
        let total_subjects: usize = category_counts.values().sum();
        let category_percentages = if total_subjects == 0 {
            BTreeMap::new()
        } else {
            category_counts
                .iter()
                .map(|(category, count)| {
                    (category.clone(), *count as f64 / total_subjects as f64 * 100.0)
                })
                .collect()
        };
        Self {
            total_subjects,
            categories_found: category_counts.keys().cloned().collect(),
            category_counts,
            category_percentages,
            error: None,
        }
    }
}
