//! Diagnostics over the alert columns of a table.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::masks::{threshold_mask, THRESHOLD_MARKER};
use crate::types::{AlertFlag, AlertTableRow};

const THRESHOLD_ALERT: &str = "threshold_alert";
const TOTAL_SESSIONS_ALERT: &str = "total_sessions_alert";
const STAGE_SESSIONS_ALERT: &str = "stage_sessions_alert";
const WATER_DAY_TOTAL_ALERT: &str = "water_day_total_alert";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnQuality {
    pub total_values: usize,
    pub missing_values: usize,
    pub missing_percentage: f64,
    pub unique_values: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdPatterns {
    /// Rows whose aggregate flag is exactly `T`.
    pub exact_matches: usize,
    /// Per annotation column, rows carrying the `"T |"` marker.
    pub pattern_matches: BTreeMap<String, usize>,
    /// Rows matching the threshold mask.
    pub total_threshold_subjects: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertPatternReport {
    pub total_subjects: usize,
    pub value_counts: BTreeMap<String, BTreeMap<String, usize>>,
    pub quality_metrics: BTreeMap<String, ColumnQuality>,
    pub threshold_patterns: ThresholdPatterns,
}

fn alert_columns(row: &AlertTableRow) -> [(&'static str, Option<&str>); 4] {
    [
        (THRESHOLD_ALERT, row.threshold_alert.as_deref()),
        (TOTAL_SESSIONS_ALERT, row.total_sessions_alert.as_deref()),
        (STAGE_SESSIONS_ALERT, row.stage_sessions_alert.as_deref()),
        (WATER_DAY_TOTAL_ALERT, row.water_day_total_alert.as_deref()),
    ]
}

/// Value counts, missing-value metrics and threshold pattern counts for
/// the four alert columns.
pub fn validate_alert_patterns(rows: &[AlertTableRow]) -> AlertPatternReport {
    let total = rows.len();
    let mut value_counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    let mut missing: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut patterns = ThresholdPatterns::default();

    for row in rows {
        for (column, value) in alert_columns(row) {
            let counts = value_counts.entry(column.to_string()).or_default();
            match value {
                Some(value) => {
                    *counts.entry(value.to_string()).or_default() += 1;
                    if column != THRESHOLD_ALERT && value.contains(THRESHOLD_MARKER) {
                        *patterns.pattern_matches.entry(column.to_string()).or_default() += 1;
                    }
                }
                None => *missing.entry(column).or_default() += 1,
            }
        }
        if row.threshold_alert.as_deref() == Some(AlertFlag::Triggered.as_str()) {
            patterns.exact_matches += 1;
        }
        if threshold_mask(row) {
            patterns.total_threshold_subjects += 1;
        }
    }

    for column in [TOTAL_SESSIONS_ALERT, STAGE_SESSIONS_ALERT, WATER_DAY_TOTAL_ALERT] {
        patterns.pattern_matches.entry(column.to_string()).or_insert(0);
    }

    let quality_metrics = [THRESHOLD_ALERT, TOTAL_SESSIONS_ALERT, STAGE_SESSIONS_ALERT, WATER_DAY_TOTAL_ALERT]
        .into_iter()
        .map(|column| {
            let missing_values = missing.get(column).copied().unwrap_or(0);
            let unique_values = rows
                .iter()
                .filter_map(|row| {
                    alert_columns(row)
                        .into_iter()
                        .find(|(name, _)| *name == column)
                        .and_then(|(_, value)| value)
                })
                .collect::<BTreeSet<_>>()
                .len();
            let quality = ColumnQuality {
                total_values: total,
                missing_values,
                missing_percentage: if total > 0 {
                    missing_values as f64 / total as f64 * 100.0
                } else {
                    0.0
                },
                unique_values,
            };
            (column.to_string(), quality)
        })
        .collect();

    AlertPatternReport {
        total_subjects: total,
        value_counts,
        quality_metrics,
        threshold_patterns: patterns,
    }
}
