//! The engine assembled by `initialize`.

use crate::classification::PercentileClassifier;
use crate::config::AlertConfig;
use crate::diagnostics::NotScoredDiagnostics;
use crate::quantile::QuantileAlertBuilder;
use crate::threshold::ThresholdRuleEngine;
use crate::traits::AlertSources;
use crate::unify::AlertUnifier;

/// Components configured from one [`AlertConfig`].
#[derive(Debug)]
pub(super) struct AlertEngine {
    pub config: AlertConfig,
    pub quantile: QuantileAlertBuilder,
    pub thresholds: ThresholdRuleEngine,
    pub unifier: AlertUnifier,
}

impl AlertEngine {
    pub fn build(config: AlertConfig, sources: &AlertSources) -> Self {
        let classifier = PercentileClassifier::new(config.percentile_categories);
        let diagnostics = NotScoredDiagnostics::new(sources.sessions.clone(), config.min_sessions);

        Self {
            quantile: QuantileAlertBuilder::new(classifier, diagnostics.clone()),
            thresholds: ThresholdRuleEngine::new(config.threshold_rules.clone()),
            unifier: AlertUnifier::new(
                classifier,
                diagnostics,
                sources.off_curriculum.clone(),
                sources.features.clone(),
            ),
            config,
        }
    }
}
