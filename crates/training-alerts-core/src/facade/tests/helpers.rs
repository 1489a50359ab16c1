//! Test helpers for facade tests.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::AlertConfig;
use crate::facade::AlertQueryFacade;
use crate::stubs::{InMemoryOffCurriculum, InMemoryPercentileSource, InMemorySessionStore};
use crate::traits::AlertSources;
use crate::types::{AlertTableRow, SessionPercentileRow, SessionRecord};

pub fn session(subject: &str, number: u32, stage: &str) -> SessionRecord {
    SessionRecord {
        subject_id: subject.to_string(),
        session_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
            + chrono::Duration::days(i64::from(number)),
        session: number,
        current_stage: Some(stage.to_string()),
        curriculum_name: Some("Uncoupled Baiting".to_string()),
        curriculum_version: Some("1.0".to_string()),
        total_trials: Some(600.0),
        finished_trials: Some(550.0),
        ignore_rate: Some(0.02),
        water_day_total: Some(1.0),
    }
}

pub fn history(subject: &str, sessions: u32) -> Vec<SessionRecord> {
    (1..=sessions).map(|n| session(subject, n, "STAGE_4")).collect()
}

/// Facade over the given sessions and percentile rows, not yet initialized.
pub fn facade(sessions: Vec<SessionRecord>, percentiles: Vec<SessionPercentileRow>) -> AlertQueryFacade {
    let off = InMemoryOffCurriculum::from_sessions(&sessions);
    AlertQueryFacade::new(
        AlertSources::new()
            .with_sessions(Arc::new(InMemorySessionStore::new(sessions)))
            .with_percentiles(Arc::new(InMemoryPercentileSource::new(percentiles)))
            .with_off_curriculum(Arc::new(off)),
    )
}

pub fn initialized(sessions: Vec<SessionRecord>, percentiles: Vec<SessionPercentileRow>) -> AlertQueryFacade {
    let facade = facade(sessions, percentiles);
    facade
        .initialize(AlertConfig::default_config())
        .expect("default config must initialize");
    facade
}

pub fn row(subject: &str, category: &str) -> AlertTableRow {
    AlertTableRow::new(subject)
        .with_category(category)
        .with_threshold_alert("N")
}
