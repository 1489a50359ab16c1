//! Writing unified alerts into dashboard table rows.

use crate::threshold::ThresholdRule;
use crate::types::{AlertCategory, AlertFlag, AlertTableRow, UnifiedAlertMap};

/// Reason written when unification could not run at all.
pub const ALERT_SERVICE_UNAVAILABLE: &str = "Alert service unavailable";

/// Fill unset alert columns with their table defaults: `NS` for the
/// category columns, `N` for the flag and annotation columns.
fn initialize_alert_columns(row: &mut AlertTableRow) {
    let ns = || Some(AlertCategory::NotScored.as_str().to_string());
    let normal = || Some(AlertFlag::Normal.as_str().to_string());

    row.percentile_category = row.percentile_category.take().or_else(ns);
    row.combined_alert = row.combined_alert.take().or_else(ns);
    row.threshold_alert = row.threshold_alert.take().or_else(normal);
    row.total_sessions_alert = row.total_sessions_alert.take().or_else(normal);
    row.stage_sessions_alert = row.stage_sessions_alert.take().or_else(normal);
    row.water_day_total_alert = row.water_day_total_alert.take().or_else(normal);
}

/// Apply unified alerts to every row whose subject has one.
///
/// The aggregate flag is only ever raised, never cleared: a row already
/// flagged `T` by the table keeps it. The combined alert is
/// `"{category}, T"` when flagged and scored, `"T"` when flagged and NS,
/// otherwise the category.
pub fn apply_unified_alerts(rows: &mut [AlertTableRow], unified: &UnifiedAlertMap) {
    for row in rows.iter_mut() {
        initialize_alert_columns(row);
        let Some(alert) = unified.get(&row.subject_id) else {
            continue;
        };

        let category = alert.alert_category;
        row.percentile_category = Some(category.as_str().to_string());
        if category == AlertCategory::NotScored {
            if let Some(reason) = &alert.ns_reason {
                row.ns_reason = Some(reason.clone());
            }
        }
        if alert.overall_percentile.is_some() {
            row.overall_percentile = alert.overall_percentile;
        }
        if let Some(strata) = &alert.strata {
            row.strata = Some(strata.clone());
        }

        if alert.has_threshold_alert() {
            row.threshold_alert = Some(AlertFlag::Triggered.as_str().to_string());
        }
        for rule in ThresholdRule::ALL {
            if let Some(outcome) = alert.threshold.rule(rule.key()) {
                let annotation = Some(outcome.display_annotation());
                match rule {
                    ThresholdRule::TotalSessions => row.total_sessions_alert = annotation,
                    ThresholdRule::StageSessions => row.stage_sessions_alert = annotation,
                    ThresholdRule::WaterDayTotal => row.water_day_total_alert = annotation,
                }
            }
        }

        let flagged = row.threshold_alert.as_deref() == Some(AlertFlag::Triggered.as_str());
        row.combined_alert = Some(match (flagged, category.is_scored()) {
            (true, true) => format!("{}, T", category),
            (true, false) => AlertFlag::Triggered.as_str().to_string(),
            (false, _) => category.as_str().to_string(),
        });
    }
}

/// Mark every row NS because alerts could not be computed.
pub fn apply_default_alert_values(rows: &mut [AlertTableRow]) {
    for row in rows.iter_mut() {
        initialize_alert_columns(row);
        let ns = AlertCategory::NotScored.as_str().to_string();
        row.percentile_category = Some(ns.clone());
        row.combined_alert = Some(ns);
        row.ns_reason = Some(ALERT_SERVICE_UNAVAILABLE.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::types::{RuleAlert, ThresholdRecord, UnifiedAlert};

    fn scored(category: AlertCategory, percentile: f64) -> UnifiedAlert {
        UnifiedAlert {
            overall_percentile: Some(percentile),
            alert_category: category,
            ns_reason: None,
            ..UnifiedAlert::not_scored("")
        }
    }

    fn thresholded(mut alert: UnifiedAlert) -> UnifiedAlert {
        let mut rules = BTreeMap::new();
        rules.insert(
            "water_day_total".to_string(),
            RuleAlert {
                value: 4.2,
                threshold: 3.5,
                alert: AlertFlag::Triggered,
                description: "Water day total: 4.2 > 3.5ml".to_string(),
                stage: None,
            },
        );
        rules.insert(
            "total_sessions".to_string(),
            RuleAlert {
                value: 12.0,
                threshold: 40.0,
                alert: AlertFlag::Normal,
                description: String::new(),
                stage: None,
            },
        );
        alert.threshold = ThresholdRecord::from_rules(rules);
        alert
    }

    #[test]
    fn test_combined_alert_variants() {
        let unified: UnifiedAlertMap = [
            ("g".to_string(), thresholded(scored(AlertCategory::Good, 80.0))),
            ("ns".to_string(), thresholded(UnifiedAlert::not_scored("No finished trials"))),
            ("b".to_string(), scored(AlertCategory::Below, 20.0)),
        ]
        .into();
        let mut rows = vec![
            AlertTableRow::new("g"),
            AlertTableRow::new("ns"),
            AlertTableRow::new("b"),
            AlertTableRow::new("unmatched"),
        ];

        apply_unified_alerts(&mut rows, &unified);

        assert_eq!(rows[0].combined_alert.as_deref(), Some("G, T"));
        assert_eq!(rows[0].water_day_total_alert.as_deref(), Some("T | Water day total: 4.2 > 3.5ml"));
        assert_eq!(rows[0].total_sessions_alert.as_deref(), Some("N"));
        assert_eq!(rows[0].overall_percentile, Some(80.0));

        assert_eq!(rows[1].combined_alert.as_deref(), Some("T"));
        assert_eq!(rows[1].percentile_category.as_deref(), Some("NS"));
        assert_eq!(rows[1].ns_reason.as_deref(), Some("No finished trials"));

        assert_eq!(rows[2].combined_alert.as_deref(), Some("B"));
        assert_eq!(rows[2].threshold_alert.as_deref(), Some("N"));

        assert_eq!(rows[3].percentile_category.as_deref(), Some("NS"), "defaults applied");
        assert_eq!(rows[3].stage_sessions_alert.as_deref(), Some("N"));
        println!("[VERIFIED] combined alert covers scored+T, NS+T and untriggered rows");
    }

    #[test]
    fn test_existing_table_flag_is_kept() {
        let unified: UnifiedAlertMap = [("n".to_string(), scored(AlertCategory::Normal, 50.0))].into();
        let mut rows = vec![AlertTableRow::new("n").with_threshold_alert("T")];
        apply_unified_alerts(&mut rows, &unified);
        assert_eq!(rows[0].threshold_alert.as_deref(), Some("T"));
        assert_eq!(rows[0].combined_alert.as_deref(), Some("N, T"));
    }

    #[test]
    fn test_default_alert_values() {
        let mut rows = vec![AlertTableRow::new("a").with_category("G"), AlertTableRow::new("b")];
        apply_default_alert_values(&mut rows);
        for row in &rows {
            assert_eq!(row.percentile_category.as_deref(), Some("NS"));
            assert_eq!(row.combined_alert.as_deref(), Some("NS"));
            assert_eq!(row.ns_reason.as_deref(), Some(ALERT_SERVICE_UNAVAILABLE));
        }
    }
}
