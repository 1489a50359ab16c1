//! Feature-level enrichment from comprehensive percentile rows.

use std::collections::{BTreeMap, BTreeSet};

use crate::classification::{ci_certainty, PercentileClassifier};
use crate::types::{FeaturePercentile, FeaturePercentileRow, SubjectId};

/// Enrichment for one subject's current strata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureEnrichment {
    pub features: BTreeMap<String, FeaturePercentile>,
    pub strata: Option<String>,
    /// Mean of the present feature percentiles, if any.
    pub candidate_overall: Option<f64>,
}

impl FeatureEnrichment {
    fn from_row(row: &FeaturePercentileRow, classifier: &PercentileClassifier) -> Self {
        let features: BTreeMap<String, FeaturePercentile> = row
            .percentile_features()
            .filter_map(|feature| {
                let percentile = row.percentile(feature)?;
                let category = classifier.classify_value(percentile);
                let processed_value = row.processed(feature);
                let certainty = row
                    .ci_width(feature)
                    .map(|width| ci_certainty(Some(width), processed_value));
                Some((
                    feature.to_string(),
                    FeaturePercentile {
                        percentile,
                        category,
                        description: category.description().to_string(),
                        processed_value,
                        certainty,
                    },
                ))
            })
            .collect();

        let candidate_overall = if features.is_empty() {
            None
        } else {
            let sum: f64 = features.values().map(|f| f.percentile).sum();
            Some(sum / features.len() as f64)
        };

        Self {
            features,
            strata: row.strata.clone(),
            candidate_overall,
        }
    }
}

/// Enrichment for every eligible subject with a current-strata row.
///
/// Non-current rows are ignored. When a subject has several current rows
/// the first one wins.
pub fn collect_enrichment(
    rows: &[FeaturePercentileRow],
    eligible: &BTreeSet<SubjectId>,
    classifier: &PercentileClassifier,
) -> BTreeMap<SubjectId, FeatureEnrichment> {
    let mut enrichment = BTreeMap::new();
    for row in rows
        .iter()
        .filter(|row| row.is_current && eligible.contains(&row.subject_id))
    {
        enrichment
            .entry(row.subject_id.clone())
            .or_insert_with(|| FeatureEnrichment::from_row(row, classifier));
    }
    enrichment
}
