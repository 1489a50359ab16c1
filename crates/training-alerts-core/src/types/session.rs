//! Session-level input records and off-curriculum bookkeeping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Subject identifier as it appears in the session table.
pub type SubjectId = String;

/// Placeholder the ingestion layer writes for unset curriculum columns.
const NONE_MARKER: &str = "None";

/// One training session for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub subject_id: SubjectId,
    pub session_date: NaiveDate,
    /// Running session number for the subject.
    pub session: u32,
    #[serde(default)]
    pub current_stage: Option<String>,
    #[serde(default)]
    pub curriculum_name: Option<String>,
    #[serde(default)]
    pub curriculum_version: Option<String>,
    #[serde(default)]
    pub total_trials: Option<f64>,
    #[serde(default)]
    pub finished_trials: Option<f64>,
    #[serde(default)]
    pub ignore_rate: Option<f64>,
    /// Cumulative daily water volume (ml).
    #[serde(default)]
    pub water_day_total: Option<f64>,
}

impl SessionRecord {
    /// Look up a named session metric. Unknown names and non-finite values are `None`.
    pub fn metric(&self, name: &str) -> Option<f64> {
        let value = match name {
            "total_trials" => self.total_trials,
            "finished_trials" => self.finished_trials,
            "ignore_rate" => self.ignore_rate,
            "water_day_total" => self.water_day_total,
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }

    /// A session is off-curriculum when its curriculum name, stage or
    /// version is unset.
    pub fn is_off_curriculum(&self) -> bool {
        is_unset(&self.curriculum_name)
            || is_unset(&self.current_stage)
            || is_unset(&self.curriculum_version)
    }
}

fn is_unset(field: &Option<String>) -> bool {
    match field {
        None => true,
        Some(value) => value.is_empty() || value == NONE_MARKER,
    }
}

/// Most recent session by date, ties broken by session number.
pub fn most_recent(records: &[SessionRecord]) -> Option<&SessionRecord> {
    records
        .iter()
        .max_by(|a, b| (a.session_date, a.session).cmp(&(b.session_date, b.session)))
}

/// Off-curriculum bookkeeping for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffCurriculumEntry {
    /// Number of off-curriculum sessions.
    pub count: usize,
    /// Total sessions for the subject, on- and off-curriculum.
    pub total_sessions: usize,
    /// Date of the most recent off-curriculum session.
    pub latest_date: Option<NaiveDate>,
}
