//! Percentile → category mapping.

use super::thresholds::CategoryThresholds;
use crate::types::AlertCategory;

/// Map a percentile to its category.
///
/// Missing or NaN input yields [`AlertCategory::NotScored`]. Otherwise the
/// first matching strict upper bound wins: p < SB → SB, p < B → B,
/// p < N → N, p < G → G, else SG.
pub fn classify(percentile: Option<f64>, thresholds: &CategoryThresholds) -> AlertCategory {
    let Some(p) = percentile.filter(|p| !p.is_nan()) else {
        return AlertCategory::NotScored;
    };

    if p < thresholds.significantly_below {
        AlertCategory::SignificantlyBelow
    } else if p < thresholds.below {
        AlertCategory::Below
    } else if p < thresholds.normal {
        AlertCategory::Normal
    } else if p < thresholds.good {
        AlertCategory::Good
    } else {
        AlertCategory::SignificantlyGood
    }
}

/// Classifier bound to one set of category thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PercentileClassifier {
    thresholds: CategoryThresholds,
}

impl PercentileClassifier {
    pub fn new(thresholds: CategoryThresholds) -> Self {
        Self { thresholds }
    }

    #[inline]
    pub fn thresholds(&self) -> &CategoryThresholds {
        &self.thresholds
    }

    #[inline]
    pub fn classify(&self, percentile: Option<f64>) -> AlertCategory {
        classify(percentile, &self.thresholds)
    }

    #[inline]
    pub fn classify_value(&self, percentile: f64) -> AlertCategory {
        classify(Some(percentile), &self.thresholds)
    }
}
