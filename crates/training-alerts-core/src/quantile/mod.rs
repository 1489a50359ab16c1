//! Quantile records from externally supplied session percentiles.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::trace;

use crate::classification::PercentileClassifier;
use crate::diagnostics::NotScoredDiagnostics;
use crate::types::{
    AlertCategory, FeatureScore, QuantileRecord, SessionPercentileRow, SubjectId, TRACKED_FEATURES,
    UNKNOWN_STRATA,
};

/// Builds one [`QuantileRecord`] per session-percentile row.
#[derive(Debug, Clone)]
pub struct QuantileAlertBuilder {
    classifier: PercentileClassifier,
    diagnostics: NotScoredDiagnostics,
}

impl QuantileAlertBuilder {
    pub fn new(classifier: PercentileClassifier, diagnostics: NotScoredDiagnostics) -> Self {
        Self {
            classifier,
            diagnostics,
        }
    }

    /// Classify one subject's most recent session.
    ///
    /// A missing overall percentile yields NS with a diagnostic reason and
    /// no feature breakdown. Otherwise the breakdown holds only the tracked
    /// features that have a value.
    pub fn build(&self, row: &SessionPercentileRow) -> QuantileRecord {
        let strata = row
            .strata
            .clone()
            .unwrap_or_else(|| UNKNOWN_STRATA.to_string());

        let Some(overall) = row.overall() else {
            let reason = self.diagnostics.reason(&row.subject_id);
            trace!(subject_id = %row.subject_id, reason = %reason, "No overall percentile");
            return QuantileRecord {
                subject_id: row.subject_id.clone(),
                overall_percentile: None,
                alert_category: AlertCategory::NotScored,
                feature_percentiles: BTreeMap::new(),
                strata,
                ns_reason: Some(reason),
            };
        };

        let feature_percentiles = TRACKED_FEATURES
            .iter()
            .filter_map(|feature| {
                row.feature(feature).map(|percentile| {
                    (
                        feature.to_string(),
                        FeatureScore {
                            percentile,
                            category: self.classifier.classify_value(percentile),
                        },
                    )
                })
            })
            .collect();

        QuantileRecord {
            subject_id: row.subject_id.clone(),
            overall_percentile: Some(overall),
            alert_category: self.classifier.classify_value(overall),
            feature_percentiles,
            strata,
            ns_reason: None,
        }
    }

    /// Build records for every row. A later row for the same subject wins.
    pub fn build_all(&self, rows: &[SessionPercentileRow]) -> BTreeMap<SubjectId, QuantileRecord> {
        let records: Vec<QuantileRecord> = rows.par_iter().map(|row| self.build(row)).collect();
        records
            .into_iter()
            .map(|record| (record.subject_id.clone(), record))
            .collect()
    }
}
