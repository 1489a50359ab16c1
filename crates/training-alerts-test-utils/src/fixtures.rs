//! Session record fixtures.

use chrono::{Duration, NaiveDate};

use training_alerts_core::types::SessionRecord;

/// Builder for one `SessionRecord` with realistic on-curriculum defaults.
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    record: SessionRecord,
}

impl SessionBuilder {
    pub fn new(subject_id: &str, session: u32) -> Self {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid fixture date");
        Self {
            record: SessionRecord {
                subject_id: subject_id.to_string(),
                session_date: start + Duration::days(i64::from(session)),
                session,
                current_stage: Some("STAGE_4".to_string()),
                curriculum_name: Some("Uncoupled Baiting".to_string()),
                curriculum_version: Some("2.3".to_string()),
                total_trials: Some(520.0),
                finished_trials: Some(480.0),
                ignore_rate: Some(0.04),
                water_day_total: Some(1.2),
            },
        }
    }

    pub fn stage(mut self, stage: &str) -> Self {
        self.record.current_stage = Some(stage.to_string());
        self
    }

    pub fn water(mut self, volume: Option<f64>) -> Self {
        self.record.water_day_total = volume;
        self
    }

    pub fn finished_trials(mut self, finished: Option<f64>) -> Self {
        self.record.finished_trials = finished;
        self
    }

    pub fn ignore_rate(mut self, rate: Option<f64>) -> Self {
        self.record.ignore_rate = rate;
        self
    }

    /// Clear the curriculum fields so the session counts as off-curriculum.
    pub fn off_curriculum(mut self) -> Self {
        self.record.curriculum_name = None;
        self.record.curriculum_version = Some("None".to_string());
        self
    }

    pub fn build(self) -> SessionRecord {
        self.record
    }
}

/// `sessions` consecutive on-curriculum sessions in STAGE_4.
pub fn history(subject_id: &str, sessions: u32) -> Vec<SessionRecord> {
    (1..=sessions)
        .map(|n| SessionBuilder::new(subject_id, n).build())
        .collect()
}

/// Consecutive sessions across stages, e.g. `[("STAGE_1", 39), ("STAGE_2", 6)]`.
pub fn staged_history(subject_id: &str, stages: &[(&str, u32)]) -> Vec<SessionRecord> {
    let mut records = Vec::new();
    let mut session = 0;
    for (stage, count) in stages {
        for _ in 0..*count {
            session += 1;
            records.push(SessionBuilder::new(subject_id, session).stage(stage).build());
        }
    }
    records
}
