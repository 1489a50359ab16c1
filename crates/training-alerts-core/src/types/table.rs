//! Dashboard table rows, one per subject.

use serde::{Deserialize, Serialize};

use super::session::SubjectId;

/// A subject row of the dashboard table.
///
/// Alert columns hold raw text as it appears in the table: the resolved
/// category abbreviation, `T`/`N` for the aggregate threshold flag, and
/// `"T | <description>"` or `"N"` for each per-metric annotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertTableRow {
    pub subject_id: SubjectId,
    #[serde(default)]
    pub percentile_category: Option<String>,
    #[serde(default)]
    pub threshold_alert: Option<String>,
    #[serde(default)]
    pub total_sessions_alert: Option<String>,
    #[serde(default)]
    pub stage_sessions_alert: Option<String>,
    #[serde(default)]
    pub water_day_total_alert: Option<String>,
    #[serde(default)]
    pub combined_alert: Option<String>,
    #[serde(default)]
    pub ns_reason: Option<String>,
    #[serde(default)]
    pub overall_percentile: Option<f64>,
    #[serde(default)]
    pub strata: Option<String>,
}

impl AlertTableRow {
    pub fn new(subject_id: impl Into<SubjectId>) -> Self {
        Self {
            subject_id: subject_id.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.percentile_category = Some(category.into());
        self
    }

    pub fn with_threshold_alert(mut self, flag: impl Into<String>) -> Self {
        self.threshold_alert = Some(flag.into());
        self
    }

    /// Per-metric annotation columns in a fixed order.
    pub fn metric_annotations(&self) -> [Option<&str>; 3] {
        [
            self.total_sessions_alert.as_deref(),
            self.stage_sessions_alert.as_deref(),
            self.water_day_total_alert.as_deref(),
        ]
    }
}
