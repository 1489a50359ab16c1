//! Property tests for classification, threshold flags and aggregation.

use proptest::prelude::*;

use training_alerts_core::classification::{classify, CategoryThresholds, PercentileClassifier};
use training_alerts_core::facade::AlertQueryFacade;
use training_alerts_core::threshold::ThresholdRuleEngine;
use training_alerts_core::types::{AlertCategory, AlertTableRow};
use training_alerts_core::{AlertConfig, AlertSources};
use training_alerts_test_utils::SessionBuilder;

fn rank(category: AlertCategory) -> u8 {
    match category {
        AlertCategory::SignificantlyBelow => 0,
        AlertCategory::Below => 1,
        AlertCategory::Normal => 2,
        AlertCategory::Good => 3,
        AlertCategory::SignificantlyGood => 4,
        AlertCategory::NotScored => u8::MAX,
    }
}

fn arb_category_cell() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        prop::sample::select(vec!["SB", "B", "N", "G", "SG", "NS", "", "bogus"])
            .prop_map(|s| Some(s.to_string())),
    ]
}

proptest! {
    #[test]
    fn classify_is_total_over_finite_percentiles(p in -50.0f64..200.0) {
        let category = PercentileClassifier::default().classify_value(p);
        prop_assert!(category.is_scored());
    }

    #[test]
    fn classify_is_monotonic(a in 0.0f64..100.0, b in 0.0f64..100.0) {
        let thresholds = CategoryThresholds::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(rank(classify(Some(lo), &thresholds)) <= rank(classify(Some(hi), &thresholds)));
    }

    #[test]
    fn threshold_flag_iff_any_rule(
        sessions in 1u32..80,
        water in proptest::option::of(0.0f64..8.0),
        stage in prop::sample::select(vec!["STAGE_1", "STAGE_3", "STAGE_FINAL", "GRADUATED", "STAGE_X"]),
    ) {
        let history: Vec<_> = (1..=sessions)
            .map(|n| SessionBuilder::new("p", n).stage(stage).water(water).build())
            .collect();
        let record = ThresholdRuleEngine::default().evaluate("p", &history);
        let any = record.specific_alerts.values().any(|alert| alert.alert.is_triggered());
        prop_assert_eq!(record.is_triggered(), any);
        for alert in record.specific_alerts.values() {
            prop_assert_eq!(alert.description.is_empty(), !alert.alert.is_triggered());
        }
    }

    #[test]
    fn aggregation_reconciles_to_row_count(cells in prop::collection::vec(arb_category_cell(), 0..60)) {
        let facade = AlertQueryFacade::new(AlertSources::new());
        facade.initialize(AlertConfig::default_config()).unwrap();
        let rows: Vec<AlertTableRow> = cells
            .into_iter()
            .enumerate()
            .map(|(i, cell)| AlertTableRow {
                percentile_category: cell,
                ..AlertTableRow::new(format!("s{}", i))
            })
            .collect();

        let counts = facade.aggregate_category_counts(&rows);
        prop_assert_eq!(counts.reconciled_total(), rows.len());
        prop_assert_eq!(counts.total_subjects, rows.len());
    }
}

#[test]
fn nan_and_missing_are_not_scored() {
    let classifier = PercentileClassifier::default();
    assert_eq!(classifier.classify(None), AlertCategory::NotScored);
    assert_eq!(classifier.classify(Some(f64::NAN)), AlertCategory::NotScored);
    println!("[PASS] nan_and_missing_are_not_scored");
}
