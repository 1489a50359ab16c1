//! Percentile rows supplied by the upstream quantile analysis.
//!
//! Percentiles and their confidence bounds are computed upstream; this crate
//! only reads them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::session::SubjectId;

/// Features whose session percentiles feed the quantile record.
pub const TRACKED_FEATURES: [&str; 5] = [
    "finished_trials",
    "ignore_rate",
    "total_trials",
    "foraging_performance",
    "abs(bias_naive)",
];

const PERCENTILE_SUFFIX: &str = "_percentile";
const PROCESSED_SUFFIX: &str = "_processed";
const CI_LOWER_SUFFIX: &str = "_ci_lower";
const CI_UPPER_SUFFIX: &str = "_ci_upper";

/// Columns ending in `_percentile` that are aggregates, not features.
const AGGREGATE_PERCENTILE_COLUMNS: [&str; 2] = ["overall_percentile", "session_overall_percentile"];

/// Most-recent-session percentile data for one subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionPercentileRow {
    pub subject_id: SubjectId,
    /// Session-level overall percentile; `None` when the subject was not scored.
    #[serde(default)]
    pub session_overall_percentile: Option<f64>,
    /// Per-feature session percentiles keyed by feature name.
    #[serde(default)]
    pub feature_percentiles: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub strata: Option<String>,
}

impl SessionPercentileRow {
    pub fn new(subject_id: impl Into<SubjectId>, overall: Option<f64>) -> Self {
        Self {
            subject_id: subject_id.into(),
            session_overall_percentile: overall,
            ..Default::default()
        }
    }

    pub fn with_feature(mut self, feature: impl Into<String>, percentile: Option<f64>) -> Self {
        self.feature_percentiles.insert(feature.into(), percentile);
        self
    }

    pub fn with_strata(mut self, strata: impl Into<String>) -> Self {
        self.strata = Some(strata.into());
        self
    }

    /// Overall percentile, with NaN treated as missing.
    pub fn overall(&self) -> Option<f64> {
        self.session_overall_percentile.filter(|p| !p.is_nan())
    }

    /// Present (non-null, non-NaN) percentile for a feature.
    pub fn feature(&self, feature: &str) -> Option<f64> {
        self.feature_percentiles
            .get(feature)
            .copied()
            .flatten()
            .filter(|p| !p.is_nan())
    }
}

/// One row of the comprehensive feature-percentile table.
///
/// Feature columns arrive flat, e.g. `finished_trials_percentile`,
/// `finished_trials_processed`, `finished_trials_ci_lower`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturePercentileRow {
    pub subject_id: SubjectId,
    #[serde(default)]
    pub strata: Option<String>,
    /// True for the subject's current strata row.
    #[serde(default)]
    pub is_current: bool,
    /// Every other column as it arrived. Only numeric values are read.
    #[serde(flatten)]
    pub columns: BTreeMap<String, Value>,
}

impl FeaturePercentileRow {
    pub fn new(subject_id: impl Into<SubjectId>, strata: impl Into<String>, is_current: bool) -> Self {
        Self {
            subject_id: subject_id.into(),
            strata: Some(strata.into()),
            is_current,
            columns: BTreeMap::new(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>, value: Option<f64>) -> Self {
        self.columns
            .insert(column.into(), value.map_or(Value::Null, Value::from));
        self
    }

    pub fn with_percentile(self, feature: &str, percentile: Option<f64>) -> Self {
        self.with_column(format!("{}{}", feature, PERCENTILE_SUFFIX), percentile)
    }

    pub fn with_processed(self, feature: &str, value: Option<f64>) -> Self {
        self.with_column(format!("{}{}", feature, PROCESSED_SUFFIX), value)
    }

    pub fn with_ci(self, feature: &str, lower: f64, upper: f64) -> Self {
        self.with_column(format!("{}{}", feature, CI_LOWER_SUFFIX), Some(lower))
            .with_column(format!("{}{}", feature, CI_UPPER_SUFFIX), Some(upper))
    }

    fn value(&self, column: &str) -> Option<f64> {
        self.columns
            .get(column)
            .and_then(Value::as_f64)
            .filter(|v| !v.is_nan())
    }

    /// Feature names that have a `<feature>_percentile` column, present or not.
    pub fn percentile_features(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().filter_map(|column| {
            if AGGREGATE_PERCENTILE_COLUMNS.contains(&column.as_str()) {
                return None;
            }
            column.strip_suffix(PERCENTILE_SUFFIX)
        })
    }

    pub fn percentile(&self, feature: &str) -> Option<f64> {
        self.value(&format!("{}{}", feature, PERCENTILE_SUFFIX))
    }

    pub fn processed(&self, feature: &str) -> Option<f64> {
        self.value(&format!("{}{}", feature, PROCESSED_SUFFIX))
    }

    /// Width of the upstream confidence interval, when both bounds are present.
    pub fn ci_width(&self, feature: &str) -> Option<f64> {
        let lower = self.value(&format!("{}{}", feature, CI_LOWER_SUFFIX))?;
        let upper = self.value(&format!("{}{}", feature, CI_UPPER_SUFFIX))?;
        Some(upper - lower)
    }
}
