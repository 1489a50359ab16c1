//! AlertQueryFacade implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, info, instrument, warn};

use super::display::{apply_default_alert_values, apply_unified_alerts};
use super::engine::AlertEngine;
use super::masks::{category_mask, matches_filter, threshold_mask};
use super::patterns::{validate_alert_patterns, AlertPatternReport};
use super::report::{AlertSummary, CategoryCounts, UNKNOWN_BUCKET};
use crate::cache::{AlertCache, CacheMetricsSnapshot};
use crate::config::{validate_config, AlertConfig, ConfigValidation};
use crate::error::{CoreError, CoreResult};
use crate::traits::AlertSources;
use crate::types::{
    AlertCategory, AlertTableRow, CategoryFilter, QuantileRecord, SubjectId, ThresholdRecord,
    UnifiedAlertMap,
};
use crate::unify::UnifyInputs;

/// Entry point for alert queries.
///
/// Construct once with the available collaborators, then call
/// [`initialize`](Self::initialize) before any query. Re-initializing
/// replaces the engine and always clears the cache.
///
/// # Caching
///
/// Only unscoped `get_unified_alerts` calls read or fill the cache slot.
/// Id-scoped calls always recompute and leave the slot untouched.
#[derive(Debug)]
pub struct AlertQueryFacade {
    sources: AlertSources,
    engine: RwLock<Option<Arc<AlertEngine>>>,
    cache: AlertCache,
}

impl AlertQueryFacade {
    pub fn new(sources: AlertSources) -> Self {
        Self {
            sources,
            engine: RwLock::new(None),
            cache: AlertCache::new(),
        }
    }

    /// Build the engine from `config`. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ConfigError` if `config` fails validation; the
    /// previous engine, if any, stays in place.
    #[instrument(skip_all, fields(min_sessions = config.min_sessions))]
    pub fn initialize(&self, config: AlertConfig) -> CoreResult<()> {
        config.validate()?;
        if !config.percentile_categories.is_strictly_ascending() {
            warn!(
                bounds = ?config.percentile_categories.as_array(),
                "Percentile category bounds are not strictly ascending"
            );
        }

        let engine = Arc::new(AlertEngine::build(config, &self.sources));
        self.cache.invalidate_with(|| *self.engine.write() = Some(engine));
        info!(sources = ?self.sources, "Alert engine initialized");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.read().is_some()
    }

    /// Active configuration, if initialized.
    pub fn config(&self) -> Option<AlertConfig> {
        self.engine.read().as_ref().map(|engine| engine.config.clone())
    }

    fn engine(&self) -> CoreResult<Arc<AlertEngine>> {
        self.engine.read().clone().ok_or(CoreError::NotInitialized)
    }

    /// Quantile records, freshly computed.
    pub fn get_quantile_alerts(
        &self,
        subject_ids: Option<&[SubjectId]>,
    ) -> CoreResult<BTreeMap<SubjectId, QuantileRecord>> {
        let engine = self.engine()?;
        Ok(self.quantile_records(&engine, subject_ids))
    }

    /// Unified alerts for `subject_ids`, or for the whole population.
    #[instrument(skip_all, fields(scoped = subject_ids.is_some(), use_cache = use_cache))]
    pub fn get_unified_alerts(
        &self,
        subject_ids: Option<&[SubjectId]>,
        use_cache: bool,
    ) -> CoreResult<Arc<UnifiedAlertMap>> {
        let engine = self.engine()?;

        // Unscoped fills read the engine under the slot lock.
        match subject_ids {
            Some(ids) => Ok(Arc::new(self.compute_unified(&engine, Some(ids)))),
            None if use_cache => self.cache.get_or_compute(|| self.compute_current(None)),
            None => self.cache.recompute(|| self.compute_current(None)),
        }
    }

    /// Clear the cache slot. Returns true if it held a result.
    pub fn clear_cache(&self) -> bool {
        self.cache.invalidate()
    }

    pub fn cache_metrics(&self) -> CacheMetricsSnapshot {
        self.cache.metrics().snapshot()
    }

    /// Rows matching `category`: `"all"`, `"T"` or a category abbreviation.
    ///
    /// `"all"` and empty input are returned unchanged even before
    /// initialization. An unknown filter is logged and the input returned
    /// unfiltered.
    pub fn filter_by_category(
        &self,
        rows: &[AlertTableRow],
        category: &str,
    ) -> CoreResult<Vec<AlertTableRow>> {
        if rows.is_empty() || category == "all" {
            return Ok(rows.to_vec());
        }
        self.engine()?;

        let filter: CategoryFilter = match category.parse() {
            Ok(filter) => filter,
            Err(e) => {
                warn!(category, error = %e, "Unknown alert category filter; returning rows unfiltered");
                return Ok(rows.to_vec());
            }
        };

        let filtered: Vec<AlertTableRow> = rows
            .iter()
            .filter(|row| matches_filter(row, filter))
            .cloned()
            .collect();
        debug!(
            category,
            before = rows.len(),
            after = filtered.len(),
            "Alert category filter applied"
        );
        Ok(filtered)
    }

    /// Count rows per standard category and reconcile against the total.
    ///
    /// Any shortfall goes to an `Unknown` bucket so the category counts
    /// always sum to the row count. Before initialization this degrades to
    /// a plain value count of the category column.
    pub fn aggregate_category_counts(&self, rows: &[AlertTableRow]) -> CategoryCounts {
        if rows.is_empty() {
            return CategoryCounts::default();
        }
        if !self.is_initialized() {
            warn!("Alert engine not initialized; returning basic aggregation");
            return fallback_aggregation(rows);
        }

        let mut category_counts: BTreeMap<String, usize> = AlertCategory::STANDARD
            .iter()
            .map(|category| {
                let count = rows.iter().filter(|row| category_mask(row, *category)).count();
                (category.as_str().to_string(), count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();

        let counted: usize = category_counts.values().sum();
        if counted < rows.len() {
            let missing = rows.len() - counted;
            debug!(missing, "Reconciling uncategorized subjects into Unknown");
            category_counts.insert(UNKNOWN_BUCKET.to_string(), missing);
        }

        CategoryCounts {
            category_counts,
            threshold_alerts: rows.iter().filter(|row| threshold_mask(row)).count(),
            total_subjects: rows.len(),
        }
    }

    /// Validate a raw configuration document without applying it.
    pub fn validate_config(&self, config: &serde_json::Value) -> ConfigValidation {
        validate_config(config)
    }

    /// Category counts and percentages over unified alerts.
    pub fn summary_stats(&self, subject_ids: Option<&[SubjectId]>) -> AlertSummary {
        match self.get_unified_alerts(subject_ids, true) {
            Ok(unified) => {
                let mut counts: BTreeMap<String, usize> = BTreeMap::new();
                for alert in unified.values() {
                    *counts.entry(alert.alert_category.as_str().to_string()).or_default() += 1;
                }
                AlertSummary::from_counts(counts)
            }
            Err(CoreError::NotInitialized) => AlertSummary::failed("Alert service not initialized"),
            Err(e) => AlertSummary::failed(format!("Error calculating alert summary: {}", e)),
        }
    }

    /// Write unified alerts for the table's subjects into `rows`.
    ///
    /// If alerts cannot be computed every row is marked NS with
    /// "Alert service unavailable".
    pub fn integrate_alerts(&self, rows: &mut [AlertTableRow]) {
        let mut subject_ids: Vec<SubjectId> = rows.iter().map(|row| row.subject_id.clone()).collect();
        subject_ids.sort_unstable();
        subject_ids.dedup();

        match self.get_unified_alerts(Some(&subject_ids), false) {
            Ok(unified) => apply_unified_alerts(rows, &unified),
            Err(e) => {
                warn!(error = %e, "Alert processing failed; applying default alert values");
                apply_default_alert_values(rows);
            }
        }
    }

    pub fn validate_alert_patterns(&self, rows: &[AlertTableRow]) -> AlertPatternReport {
        validate_alert_patterns(rows)
    }

    fn quantile_records(
        &self,
        engine: &AlertEngine,
        subject_ids: Option<&[SubjectId]>,
    ) -> BTreeMap<SubjectId, QuantileRecord> {
        let Some(source) = &self.sources.percentiles else {
            debug!("No percentile source; quantile records are empty");
            return BTreeMap::new();
        };
        match source.session_overall_percentiles(subject_ids) {
            Ok(rows) => engine.quantile.build_all(&rows),
            Err(e) => {
                error!(error = %e, "Error retrieving session-level overall percentiles");
                BTreeMap::new()
            }
        }
    }

    fn threshold_records(
        &self,
        engine: &AlertEngine,
        subject_ids: Option<&[SubjectId]>,
    ) -> BTreeMap<SubjectId, ThresholdRecord> {
        let Some(store) = &self.sources.sessions else {
            return BTreeMap::new();
        };

        let Some(ids) = subject_ids else {
            return match store.all_sessions() {
                Ok(sessions) => engine.thresholds.evaluate_population(&sessions),
                Err(e) => {
                    error!(error = %e, "Error loading sessions for threshold alerts");
                    BTreeMap::new()
                }
            };
        };

        ids.iter()
            .filter_map(|id| match store.sessions_for(id) {
                Ok(history) if history.is_empty() => None,
                Ok(history) => Some((id.clone(), engine.thresholds.evaluate(id, &history))),
                Err(e) => {
                    error!(subject_id = %id, error = %e, "Error loading sessions for threshold alerts");
                    None
                }
            })
            .collect()
    }

    fn population(&self) -> Vec<SubjectId> {
        let Some(store) = &self.sources.sessions else {
            return Vec::new();
        };
        store.subject_ids().unwrap_or_else(|e| {
            error!(error = %e, "Error listing subjects in the working population");
            Vec::new()
        })
    }

    fn compute_current(&self, subject_ids: Option<&[SubjectId]>) -> CoreResult<UnifiedAlertMap> {
        let engine = self.engine()?;
        Ok(self.compute_unified(&engine, subject_ids))
    }

    fn compute_unified(
        &self,
        engine: &AlertEngine,
        subject_ids: Option<&[SubjectId]>,
    ) -> UnifiedAlertMap {
        let quantile = self.quantile_records(engine, subject_ids);
        let threshold = self.threshold_records(engine, subject_ids);
        let population = match subject_ids {
            Some(_) => Vec::new(),
            None => self.population(),
        };

        engine.unifier.unify(UnifyInputs {
            requested: subject_ids,
            quantile: &quantile,
            threshold: &threshold,
            population: &population,
        })
    }
}

/// Value count of the category column; missing categories are not counted.
fn fallback_aggregation(rows: &[AlertTableRow]) -> CategoryCounts {
    let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();
    for category in rows.iter().filter_map(|row| row.percentile_category.as_deref()) {
        *category_counts.entry(category.to_string()).or_default() += 1;
    }
    CategoryCounts {
        category_counts,
        threshold_alerts: 0,
        total_subjects: rows.len(),
    }
}
