//! Threshold rule evaluation over a subject's session history.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{debug, trace};

use super::rules::{ThresholdRule, ThresholdRuleConfig};
use crate::types::{AlertFlag, RuleAlert, SessionRecord, SubjectId, ThresholdRecord};

/// Evaluates the fixed threshold rules for one subject at a time.
#[derive(Debug, Clone, Default)]
pub struct ThresholdRuleEngine {
    config: ThresholdRuleConfig,
}

impl ThresholdRuleEngine {
    pub fn new(config: ThresholdRuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ThresholdRuleConfig {
        &self.config
    }

    /// Evaluate every rule against `history`.
    ///
    /// Records belonging to other subjects are ignored. An empty history
    /// yields the clear `{N, {}}` record.
    pub fn evaluate(&self, subject_id: &str, history: &[SessionRecord]) -> ThresholdRecord {
        let own: Vec<&SessionRecord> = history
            .iter()
            .filter(|record| record.subject_id == subject_id)
            .collect();

        let Some(latest) = own
            .iter()
            .copied()
            .max_by(|a, b| (a.session_date, a.session).cmp(&(b.session_date, b.session)))
        else {
            trace!(subject_id, "No session history; threshold record is clear");
            return ThresholdRecord::clear();
        };

        let specific_alerts: BTreeMap<String, RuleAlert> = ThresholdRule::ALL
            .iter()
            .filter_map(|rule| {
                self.evaluate_rule(*rule, latest, &own)
                    .map(|alert| (rule.key().to_string(), alert))
            })
            .collect();

        let mut record = ThresholdRecord::from_rules(specific_alerts);
        record.session_count = Some(latest.session);
        record.water_day_total = Some(latest.water_day_total.unwrap_or(0.0));
        record.stage = latest.current_stage.clone();
        record.session_date = Some(latest.session_date);

        if record.is_triggered() {
            debug!(
                subject_id,
                rules = ?record
                    .specific_alerts
                    .iter()
                    .filter(|(_, alert)| alert.alert.is_triggered())
                    .map(|(name, _)| name.as_str())
                    .collect::<Vec<_>>(),
                "Threshold alert raised"
            );
        }
        record
    }

    /// Evaluate every subject present in `sessions`.
    pub fn evaluate_population(
        &self,
        sessions: &[SessionRecord],
    ) -> BTreeMap<SubjectId, ThresholdRecord> {
        let mut by_subject: BTreeMap<&str, Vec<SessionRecord>> = BTreeMap::new();
        for record in sessions {
            by_subject
                .entry(record.subject_id.as_str())
                .or_default()
                .push(record.clone());
        }

        by_subject
            .into_par_iter()
            .map(|(subject_id, history)| (subject_id.to_string(), self.evaluate(subject_id, &history)))
            .collect()
    }

    /// `None` when the rule does not apply to this subject.
    fn evaluate_rule(
        &self,
        rule: ThresholdRule,
        latest: &SessionRecord,
        history: &[&SessionRecord],
    ) -> Option<RuleAlert> {
        match rule {
            ThresholdRule::TotalSessions => {
                let count = latest.session;
                let limit = self.config.total_sessions_limit;
                Some(rule_alert(
                    f64::from(count),
                    f64::from(limit),
                    count > limit,
                    || format!("Total sessions: {} > {}", count, limit),
                ))
            }
            ThresholdRule::StageSessions => {
                let stage = latest.current_stage.as_deref()?;
                let limit = self.config.stage_limit(stage)?;
                let count = history
                    .iter()
                    .filter(|record| record.current_stage.as_deref() == Some(stage))
                    .count() as u32;
                let mut alert = rule_alert(
                    f64::from(count),
                    f64::from(limit),
                    count > limit,
                    || format!("{}: {} > {}", stage, count, limit),
                );
                alert.stage = Some(stage.to_string());
                Some(alert)
            }
            ThresholdRule::WaterDayTotal => {
                let volume = latest.water_day_total.filter(|v| v.is_finite()).unwrap_or(0.0);
                let limit = self.config.water_day_total_limit;
                Some(rule_alert(volume, limit, volume > limit, || {
                    format!(
                        "Water day total: {} > {}ml",
                        format_volume(volume),
                        format_volume(limit)
                    )
                }))
            }
        }
    }
}

fn rule_alert(
    value: f64,
    threshold: f64,
    triggered: bool,
    describe: impl FnOnce() -> String,
) -> RuleAlert {
    RuleAlert {
        value,
        threshold,
        alert: AlertFlag::from_triggered(triggered),
        description: if triggered { describe() } else { String::new() },
        stage: None,
    }
}

/// Whole volumes keep one decimal place ("4.0ml", not "4ml").
fn format_volume(volume: f64) -> String {
    if volume.fract() == 0.0 {
        format!("{:.1}", volume)
    } else {
        volume.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn session(subject: &str, number: u32, stage: &str, water: Option<f64>) -> SessionRecord {
        SessionRecord {
            subject_id: subject.to_string(),
            session_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                + chrono::Duration::days(i64::from(number)),
            session: number,
            current_stage: Some(stage.to_string()),
            curriculum_name: Some("Uncoupled Baiting".to_string()),
            curriculum_version: Some("1.0".to_string()),
            total_trials: Some(500.0),
            finished_trials: Some(450.0),
            ignore_rate: Some(0.05),
            water_day_total: water,
        }
    }

    #[test]
    fn test_empty_history_is_clear() {
        let engine = ThresholdRuleEngine::default();
        let record = engine.evaluate("s1", &[]);
        assert_eq!(record, ThresholdRecord::clear());
        assert_eq!(record.threshold_alert, AlertFlag::Normal);
        assert!(record.specific_alerts.is_empty());
    }

    #[test]
    fn test_all_rules_normal() {
        let engine = ThresholdRuleEngine::default();
        let history: Vec<_> = (1..=3).map(|n| session("s1", n, "STAGE_1", Some(1.0))).collect();
        let record = engine.evaluate("s1", &history);

        assert!(!record.is_triggered());
        assert_eq!(record.specific_alerts.len(), 3);
        for alert in record.specific_alerts.values() {
            assert_eq!(alert.alert, AlertFlag::Normal);
            assert!(alert.description.is_empty());
        }
        assert_eq!(record.session_count, Some(3));
        assert_eq!(record.stage.as_deref(), Some("STAGE_1"));
    }

    #[test]
    fn test_total_and_stage_sessions_trigger() {
        // 39 sessions in STAGE_1 followed by 6 in STAGE_2.
        let engine = ThresholdRuleEngine::default();
        let mut history: Vec<_> = (1..=39).map(|n| session("d", n, "STAGE_1", Some(1.0))).collect();
        history.extend((40..=45).map(|n| session("d", n, "STAGE_2", Some(2.0))));

        let record = engine.evaluate("d", &history);

        let total = record.rule("total_sessions").unwrap();
        assert_eq!(total.alert, AlertFlag::Triggered);
        assert_eq!(total.description, "Total sessions: 45 > 40");

        let stage = record.rule("stage_sessions").unwrap();
        assert_eq!(stage.alert, AlertFlag::Triggered);
        assert_eq!(stage.value, 6.0);
        assert_eq!(stage.threshold, 5.0);
        assert_eq!(stage.description, "STAGE_2: 6 > 5");
        assert_eq!(stage.stage.as_deref(), Some("STAGE_2"));

        let water = record.rule("water_day_total").unwrap();
        assert_eq!(water.alert, AlertFlag::Normal);
        assert_eq!(water.value, 2.0);

        assert_eq!(record.threshold_alert, AlertFlag::Triggered);
        println!("[VERIFIED] total and stage rules trigger independently of water rule");
    }

    #[test]
    fn test_total_sessions_reads_session_number() {
        // Sessions 1..=38 were dropped upstream; only 39..=42 arrive.
        let engine = ThresholdRuleEngine::default();
        let history: Vec<_> = (39..=42).map(|n| session("g", n, "STAGE_FINAL", Some(1.0))).collect();
        let record = engine.evaluate("g", &history);

        let total = record.rule("total_sessions").unwrap();
        assert_eq!(total.value, 42.0);
        assert!(total.alert.is_triggered());
        assert_eq!(total.description, "Total sessions: 42 > 40");
        assert_eq!(record.session_count, Some(42));
    }

    #[test]
    fn test_untracked_stage_skips_stage_rule() {
        let engine = ThresholdRuleEngine::default();
        let history = vec![session("s1", 1, "STAGE_5", Some(1.0))];
        let record = engine.evaluate("s1", &history);
        assert!(record.rule("stage_sessions").is_none());
        assert!(record.rule("total_sessions").is_some());
    }

    #[test]
    fn test_water_rule_and_missing_volume() {
        let engine = ThresholdRuleEngine::default();

        let record = engine.evaluate("s1", &[session("s1", 1, "STAGE_1", Some(4.0))]);
        let water = record.rule("water_day_total").unwrap();
        assert!(water.alert.is_triggered());
        assert_eq!(water.description, "Water day total: 4.0 > 3.5ml");
        assert!(record.is_triggered());

        let record = engine.evaluate("s1", &[session("s1", 1, "STAGE_1", None)]);
        let water = record.rule("water_day_total").unwrap();
        assert_eq!(water.value, 0.0);
        assert!(!water.alert.is_triggered());
    }

    #[test]
    fn test_limits_are_strict() {
        let engine = ThresholdRuleEngine::default();
        let history: Vec<_> = (1..=40).map(|n| session("s1", n, "GRADUATED", Some(3.5))).collect();
        let record = engine.evaluate("s1", &history);
        assert!(!record.rule("total_sessions").unwrap().alert.is_triggered());
        assert!(!record.rule("water_day_total").unwrap().alert.is_triggered());
        // 40 sessions in GRADUATED exceeds its limit of 20.
        assert!(record.rule("stage_sessions").unwrap().alert.is_triggered());
    }

    #[test]
    fn test_flag_iff_any_rule() {
        let engine = ThresholdRuleEngine::default();
        for (count, water) in [(3u32, 1.0), (41, 1.0), (3, 5.0), (41, 5.0)] {
            let history: Vec<_> = (1..=count).map(|n| session("s", n, "STAGE_4", Some(water))).collect();
            let record = engine.evaluate("s", &history);
            let any = record.specific_alerts.values().any(|a| a.alert.is_triggered());
            assert_eq!(record.is_triggered(), any, "count={} water={}", count, water);
        }
    }

    #[test]
    fn test_evaluate_population_groups_by_subject() {
        let engine = ThresholdRuleEngine::default();
        let mut sessions: Vec<_> = (1..=2).map(|n| session("a", n, "STAGE_1", Some(1.0))).collect();
        sessions.push(session("b", 1, "STAGE_1", Some(9.0)));

        let records = engine.evaluate_population(&sessions);
        assert_eq!(records.len(), 2);
        assert!(!records["a"].is_triggered());
        assert!(records["b"].is_triggered());
        assert_eq!(records["a"].session_count, Some(2));
    }

    #[test]
    fn test_foreign_records_ignored() {
        let engine = ThresholdRuleEngine::default();
        let history = vec![session("other", 50, "STAGE_1", Some(9.0))];
        assert_eq!(engine.evaluate("s1", &history), ThresholdRecord::clear());
    }
}
