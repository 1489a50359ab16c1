//! Test helpers for unification tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::classification::PercentileClassifier;
use crate::diagnostics::NotScoredDiagnostics;
use crate::stubs::{InMemoryFeatureSource, InMemoryOffCurriculum, InMemorySessionStore};
use crate::traits::FeaturePercentileSource;
use crate::types::{
    AlertCategory, AlertFlag, OffCurriculumEntry, QuantileRecord, RuleAlert, SessionRecord,
    ThresholdRecord, UNKNOWN_STRATA,
};
use crate::unify::AlertUnifier;

pub fn session(subject: &str, number: u32) -> SessionRecord {
    SessionRecord {
        subject_id: subject.to_string(),
        session_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
            + chrono::Duration::days(i64::from(number)),
        session: number,
        current_stage: Some("STAGE_3".to_string()),
        curriculum_name: Some("Uncoupled Without Baiting".to_string()),
        curriculum_version: Some("1.0".to_string()),
        total_trials: Some(500.0),
        finished_trials: Some(420.0),
        ignore_rate: Some(0.04),
        water_day_total: Some(1.0),
    }
}

pub fn quantile(subject: &str, overall: Option<f64>) -> QuantileRecord {
    let classifier = PercentileClassifier::default();
    QuantileRecord {
        subject_id: subject.to_string(),
        overall_percentile: overall,
        alert_category: classifier.classify(overall),
        feature_percentiles: BTreeMap::new(),
        strata: "Uncoupled Without Baiting_ADVANCED_v1".to_string(),
        ns_reason: overall.is_none().then(|| "Scoring criteria not met".to_string()),
    }
}

pub fn triggered_threshold() -> ThresholdRecord {
    let mut rules = BTreeMap::new();
    rules.insert(
        "total_sessions".to_string(),
        RuleAlert {
            value: 45.0,
            threshold: 40.0,
            alert: AlertFlag::Triggered,
            description: "Total sessions: 45 > 40".to_string(),
            stage: None,
        },
    );
    ThresholdRecord::from_rules(rules)
}

pub fn off_curriculum(subjects: &[&str]) -> InMemoryOffCurriculum {
    let mut registry = InMemoryOffCurriculum::default();
    for subject in subjects {
        registry.insert(
            *subject,
            OffCurriculumEntry {
                count: 1,
                total_sessions: 3,
                latest_date: NaiveDate::from_ymd_opt(2024, 4, 3),
            },
        );
    }
    registry
}

pub fn unifier(
    sessions: Vec<SessionRecord>,
    off: InMemoryOffCurriculum,
    features: Option<Arc<dyn FeaturePercentileSource>>,
) -> AlertUnifier {
    AlertUnifier::new(
        PercentileClassifier::default(),
        NotScoredDiagnostics::new(Some(Arc::new(InMemorySessionStore::new(sessions))), 1),
        Some(Arc::new(off)),
        features,
    )
}

pub fn feature_source(rows: Vec<crate::types::FeaturePercentileRow>) -> Option<Arc<dyn FeaturePercentileSource>> {
    Some(Arc::new(InMemoryFeatureSource::new(rows)))
}

pub fn assert_ns(category: AlertCategory) {
    assert_eq!(category, AlertCategory::NotScored);
}

pub const DEFAULT_STRATA: &str = UNKNOWN_STRATA;
