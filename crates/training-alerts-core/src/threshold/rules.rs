//! The fixed set of threshold rules and their limits.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::constants::{
    DEFAULT_STAGE_SESSION_LIMITS, DEFAULT_TOTAL_SESSIONS_LIMIT, DEFAULT_WATER_DAY_TOTAL_LIMIT,
};
use crate::error::{CoreError, CoreResult};

/// Named threshold rules, evaluated in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ThresholdRule {
    /// Total session count above the limit.
    ///
    /// The count is the most recent record's session number, not the number
    /// of records supplied, so gaps in the history do not lower it.
    TotalSessions,
    /// Sessions spent in the current stage above the per-stage limit.
    StageSessions,
    /// Most recent daily water volume above the limit.
    WaterDayTotal,
}

impl ThresholdRule {
    pub const ALL: [ThresholdRule; 3] = [
        Self::TotalSessions,
        Self::StageSessions,
        Self::WaterDayTotal,
    ];

    /// Key used in `ThresholdRecord::specific_alerts`.
    pub const fn key(self) -> &'static str {
        match self {
            Self::TotalSessions => "total_sessions",
            Self::StageSessions => "stage_sessions",
            Self::WaterDayTotal => "water_day_total",
        }
    }
}

/// Limits for the threshold rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRuleConfig {
    #[serde(default = "default_total_sessions_limit")]
    pub total_sessions_limit: u32,

    #[serde(default = "default_water_day_total_limit")]
    pub water_day_total_limit: f64,

    /// Stage name → allowed sessions. Stages not listed are not evaluated.
    #[serde(default = "default_stage_session_limits")]
    pub stage_session_limits: BTreeMap<String, u32>,
}

fn default_total_sessions_limit() -> u32 {
    DEFAULT_TOTAL_SESSIONS_LIMIT
}

fn default_water_day_total_limit() -> f64 {
    DEFAULT_WATER_DAY_TOTAL_LIMIT
}

fn default_stage_session_limits() -> BTreeMap<String, u32> {
    DEFAULT_STAGE_SESSION_LIMITS
        .iter()
        .map(|(stage, limit)| (stage.to_string(), *limit))
        .collect()
}

impl Default for ThresholdRuleConfig {
    fn default() -> Self {
        Self {
            total_sessions_limit: default_total_sessions_limit(),
            water_day_total_limit: default_water_day_total_limit(),
            stage_session_limits: default_stage_session_limits(),
        }
    }
}

impl ThresholdRuleConfig {
    /// Limit for a stage, if that stage is tracked.
    pub fn stage_limit(&self, stage: &str) -> Option<u32> {
        self.stage_session_limits.get(stage).copied()
    }

    /// FAIL FAST on limits that would make a rule meaningless.
    pub fn validate(&self) -> CoreResult<()> {
        if self.total_sessions_limit == 0 {
            return Err(CoreError::ConfigError(
                "threshold_rules.total_sessions_limit must be greater than 0".into(),
            ));
        }
        if !self.water_day_total_limit.is_finite() || self.water_day_total_limit <= 0.0 {
            return Err(CoreError::ConfigError(format!(
                "threshold_rules.water_day_total_limit must be a finite positive number, got {}",
                self.water_day_total_limit
            )));
        }
        if self.stage_session_limits.keys().any(|stage| stage.is_empty()) {
            return Err(CoreError::ConfigError(
                "threshold_rules.stage_session_limits contains an empty stage name".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stage_table() {
        let config = ThresholdRuleConfig::default();
        assert_eq!(config.stage_limit("STAGE_1"), Some(5));
        assert_eq!(config.stage_limit("STAGE_2"), Some(5));
        assert_eq!(config.stage_limit("STAGE_3"), Some(6));
        assert_eq!(config.stage_limit("STAGE_4"), Some(10));
        assert_eq!(config.stage_limit("STAGE_FINAL"), Some(10));
        assert_eq!(config.stage_limit("GRADUATED"), Some(20));
        assert_eq!(config.stage_limit("STAGE_5"), None);
        assert_eq!(config.total_sessions_limit, 40);
        assert_eq!(config.water_day_total_limit, 3.5);
    }

    #[test]
    fn test_rule_keys_are_unique() {
        let mut keys: Vec<&str> = ThresholdRule::ALL.iter().map(|r| r.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), ThresholdRule::ALL.len());
    }

    #[test]
    fn test_negative_water_limit_rejected() {
        let config = ThresholdRuleConfig {
            water_day_total_limit: -1.0,
            ..ThresholdRuleConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(ThresholdRuleConfig::default().validate().is_ok());
    }
}
