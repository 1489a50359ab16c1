//! Per-subject alert resolution.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use super::enrichment::{collect_enrichment, FeatureEnrichment};
use crate::classification::PercentileClassifier;
use crate::diagnostics::NotScoredDiagnostics;
use crate::traits::{FeaturePercentileSource, OffCurriculumRegistry};
use crate::types::{
    AlertCategory, QuantileRecord, SubjectId, ThresholdRecord, UnifiedAlert, UnifiedAlertMap,
};

/// Already-computed per-subject signals for one unification pass.
#[derive(Debug, Clone, Copy)]
pub struct UnifyInputs<'a> {
    /// Restrict output to exactly these subjects.
    pub requested: Option<&'a [SubjectId]>,
    pub quantile: &'a BTreeMap<SubjectId, QuantileRecord>,
    pub threshold: &'a BTreeMap<SubjectId, ThresholdRecord>,
    /// Every subject in the working population. Only read when unscoped.
    pub population: &'a [SubjectId],
}

/// Which precedence branch a subject falls into.
enum Resolution<'a> {
    OffCurriculum,
    Merged {
        quantile: Option<&'a QuantileRecord>,
        threshold: Option<&'a ThresholdRecord>,
    },
    Untouched,
}

/// Merges quantile, threshold, off-curriculum and feature signals.
#[derive(Clone)]
pub struct AlertUnifier {
    classifier: PercentileClassifier,
    diagnostics: NotScoredDiagnostics,
    off_curriculum: Option<Arc<dyn OffCurriculumRegistry>>,
    features: Option<Arc<dyn FeaturePercentileSource>>,
}

impl AlertUnifier {
    pub fn new(
        classifier: PercentileClassifier,
        diagnostics: NotScoredDiagnostics,
        off_curriculum: Option<Arc<dyn OffCurriculumRegistry>>,
        features: Option<Arc<dyn FeaturePercentileSource>>,
    ) -> Self {
        Self {
            classifier,
            diagnostics,
            off_curriculum,
            features,
        }
    }

    /// Produce exactly one unified alert per subject in the subject set.
    ///
    /// Never fails: a broken feature source only drops enrichment.
    #[instrument(skip_all, fields(scoped = inputs.requested.is_some()))]
    pub fn unify(&self, inputs: UnifyInputs<'_>) -> UnifiedAlertMap {
        let subjects: Vec<SubjectId> = self.subject_set(&inputs).into_iter().collect();

        let resolutions: Vec<(&SubjectId, Resolution<'_>)> = subjects
            .iter()
            .map(|id| (id, self.resolution(id, &inputs)))
            .collect();

        let eligible: BTreeSet<SubjectId> = resolutions
            .iter()
            .filter(|(_, resolution)| matches!(resolution, Resolution::Merged { .. }))
            .map(|(id, _)| (*id).clone())
            .collect();
        let enrichment = self.enrichment(&eligible);

        let unified: UnifiedAlertMap = resolutions
            .into_par_iter()
            .map(|(id, resolution)| {
                let alert = self.resolve(id, resolution, enrichment.get(id));
                (id.clone(), alert)
            })
            .collect();

        let not_scored = unified.values().filter(|alert| !alert.is_scored()).count();
        info!(
            subjects = unified.len(),
            not_scored,
            enriched = enrichment.len(),
            "Unified alerts computed"
        );
        unified
    }

    /// The requested subjects, or every id known to any source.
    fn subject_set(&self, inputs: &UnifyInputs<'_>) -> BTreeSet<SubjectId> {
        if let Some(ids) = inputs.requested {
            return ids.iter().cloned().collect();
        }
        let mut subjects: BTreeSet<SubjectId> = inputs
            .quantile
            .keys()
            .chain(inputs.threshold.keys())
            .chain(inputs.population.iter())
            .cloned()
            .collect();
        if let Some(registry) = &self.off_curriculum {
            subjects.extend(registry.subject_ids());
        }
        subjects
    }

    fn resolution<'a>(&self, subject_id: &str, inputs: &UnifyInputs<'a>) -> Resolution<'a> {
        if self.is_off_curriculum(subject_id) {
            return Resolution::OffCurriculum;
        }
        let quantile = inputs.quantile.get(subject_id);
        let threshold = inputs.threshold.get(subject_id);
        if quantile.is_none() && threshold.is_none() {
            Resolution::Untouched
        } else {
            Resolution::Merged {
                quantile,
                threshold,
            }
        }
    }

    fn is_off_curriculum(&self, subject_id: &str) -> bool {
        self.off_curriculum
            .as_ref()
            .is_some_and(|registry| registry.contains(subject_id))
    }

    fn enrichment(&self, eligible: &BTreeSet<SubjectId>) -> BTreeMap<SubjectId, FeatureEnrichment> {
        let Some(source) = &self.features else {
            return BTreeMap::new();
        };
        if eligible.is_empty() {
            return BTreeMap::new();
        }
        match source.comprehensive_rows() {
            Ok(rows) => collect_enrichment(&rows, eligible, &self.classifier),
            Err(e) => {
                warn!(error = %e, "Feature percentile enrichment failed; continuing without it");
                BTreeMap::new()
            }
        }
    }

    fn resolve(
        &self,
        subject_id: &str,
        resolution: Resolution<'_>,
        enrichment: Option<&FeatureEnrichment>,
    ) -> UnifiedAlert {
        match resolution {
            Resolution::OffCurriculum => {
                debug!(subject_id, "Off-curriculum subject forced to NS");
                UnifiedAlert::not_scored(self.diagnostics.reason(subject_id))
            }
            Resolution::Untouched => UnifiedAlert::not_scored(self.diagnostics.reason(subject_id)),
            Resolution::Merged {
                quantile,
                threshold,
            } => self.merge(subject_id, quantile, threshold, enrichment),
        }
    }

    fn merge(
        &self,
        subject_id: &str,
        quantile: Option<&QuantileRecord>,
        threshold: Option<&ThresholdRecord>,
        enrichment: Option<&FeatureEnrichment>,
    ) -> UnifiedAlert {
        // Feature mean takes precedence over the session-level percentile.
        let overall_percentile = enrichment
            .and_then(|e| e.candidate_overall)
            .or_else(|| quantile.and_then(|q| q.overall_percentile))
            .filter(|p| !p.is_nan());

        let alert_category = self.classifier.classify(overall_percentile);
        let ns_reason = (alert_category == AlertCategory::NotScored).then(|| {
            quantile
                .and_then(|q| q.ns_reason.clone())
                .unwrap_or_else(|| self.diagnostics.reason(subject_id))
        });

        let strata = enrichment
            .and_then(|e| e.strata.clone())
            .or_else(|| quantile.map(|q| q.strata.clone()));

        UnifiedAlert {
            quantile: quantile.cloned(),
            threshold: threshold.cloned().unwrap_or_default(),
            overall_percentile,
            alert_category,
            ns_reason,
            strata,
            feature_percentiles: enrichment.map(|e| e.features.clone()),
        }
    }
}

impl std::fmt::Debug for AlertUnifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertUnifier")
            .field("classifier", &self.classifier)
            .field("diagnostics", &self.diagnostics)
            .field("has_off_curriculum", &self.off_curriculum.is_some())
            .field("has_features", &self.features.is_some())
            .finish()
    }
}
