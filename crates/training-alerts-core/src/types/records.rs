//! Per-subject alert records: quantile, threshold and unified.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::category::{AlertCategory, AlertFlag};
use super::session::SubjectId;
use crate::classification::CiCertainty;

/// Strata label used when the percentile source did not report one.
pub const UNKNOWN_STRATA: &str = "Unknown";

/// Percentile and category for one feature of the most recent session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureScore {
    pub percentile: f64,
    pub category: AlertCategory,
}

/// Quantile-derived alert for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileRecord {
    pub subject_id: SubjectId,
    pub overall_percentile: Option<f64>,
    pub alert_category: AlertCategory,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub feature_percentiles: BTreeMap<String, FeatureScore>,
    pub strata: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ns_reason: Option<String>,
}

/// Outcome of one named threshold rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleAlert {
    pub value: f64,
    pub threshold: f64,
    pub alert: AlertFlag,
    /// Empty unless `alert` is `T`.
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

impl RuleAlert {
    /// Raw table annotation: `"T | <description>"` or `"N"`.
    pub fn display_annotation(&self) -> String {
        match self.alert {
            AlertFlag::Triggered => format!("T | {}", self.description),
            AlertFlag::Normal => AlertFlag::Normal.as_str().to_string(),
        }
    }
}

/// Threshold-derived alert for one subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRecord {
    pub threshold_alert: AlertFlag,
    pub specific_alerts: BTreeMap<String, RuleAlert>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_day_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_date: Option<NaiveDate>,
}

impl ThresholdRecord {
    /// The default `{N, {}}` record.
    pub fn clear() -> Self {
        Self::default()
    }

    /// Build a record whose aggregate flag is derived from its rules.
    pub fn from_rules(specific_alerts: BTreeMap<String, RuleAlert>) -> Self {
        let triggered = specific_alerts.values().any(|rule| rule.alert.is_triggered());
        Self {
            threshold_alert: AlertFlag::from_triggered(triggered),
            specific_alerts,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_triggered(&self) -> bool {
        self.threshold_alert.is_triggered()
    }

    pub fn rule(&self, name: &str) -> Option<&RuleAlert> {
        self.specific_alerts.get(name)
    }
}

/// Feature-level enrichment attached to a unified alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturePercentile {
    pub percentile: f64,
    pub category: AlertCategory,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certainty: Option<CiCertainty>,
}

/// The single authoritative alert for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedAlert {
    /// Serialized as `{}` when absent.
    #[serde(default, with = "empty_object")]
    pub quantile: Option<QuantileRecord>,
    pub threshold: ThresholdRecord,
    pub overall_percentile: Option<f64>,
    pub alert_category: AlertCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ns_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strata: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_percentiles: Option<BTreeMap<String, FeaturePercentile>>,
}

impl UnifiedAlert {
    /// Not-scored alert with no quantile data and a clear threshold record.
    pub fn not_scored(reason: impl Into<String>) -> Self {
        Self {
            quantile: None,
            threshold: ThresholdRecord::clear(),
            overall_percentile: None,
            alert_category: AlertCategory::NotScored,
            ns_reason: Some(reason.into()),
            strata: None,
            feature_percentiles: None,
        }
    }

    #[inline]
    pub fn is_scored(&self) -> bool {
        self.alert_category.is_scored()
    }

    #[inline]
    pub fn has_threshold_alert(&self) -> bool {
        self.threshold.is_triggered()
    }
}

/// Unified alerts keyed by subject.
pub type UnifiedAlertMap = BTreeMap<SubjectId, UnifiedAlert>;

/// Serde adapter mapping `None` to `{}` and `{}` back to `None`.
mod empty_object {
    use serde::de::DeserializeOwned;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match &value {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::Object(map) if map.is_empty() => Ok(None),
            _ => serde_json::from_value(value)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
