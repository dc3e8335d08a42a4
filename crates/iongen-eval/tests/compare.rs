use std::collections::BTreeMap;

use iongen_eval::{
    BenchmarkResult, EvalError, MetricScore, compare_results, detect_regressions,
    relative_differences, threshold_map,
};

fn result(entries: &[(&str, f64, f64)]) -> BenchmarkResult {
    let mut scores = BTreeMap::new();
    for (metric, score, error) in entries {
        scores.insert(
            metric.to_string(),
            MetricScore {
                score: *score,
                error: *error,
            },
        );
    }
    BenchmarkResult { scores }
}

#[test]
fn relative_difference_is_scaled_by_the_baseline() {
    let previous = result(&[("deserialize", 100.0, 1.0)]);
    let new = result(&[("deserialize", 90.0, 1.0)]);
    let differences = relative_differences(&previous, &new).expect("metrics align");
    assert_eq!(differences["deserialize"], -0.1);
}

#[test]
fn threshold_is_the_combined_noise_band() {
    let previous = result(&[("deserialize", 100.0, 1.0)]);
    let new = result(&[("deserialize", 90.0, 1.0)]);
    let thresholds = threshold_map(&previous, &new).expect("metrics align");
    assert_eq!(thresholds["deserialize"], -0.02);
}

#[test]
fn a_drop_beyond_the_noise_band_is_a_regression() {
    let previous = result(&[("deserialize", 100.0, 1.0)]);
    let new = result(&[("deserialize", 90.0, 1.0)]);
    let report = compare_results(&previous, &new).expect("comparison succeeds");
    assert_eq!(report.score_difference["deserialize"], -10.0);
    assert_eq!(report.regressions["deserialize"], -0.1);
}

#[test]
fn a_drop_within_the_noise_band_is_not_a_regression() {
    let previous = result(&[("deserialize", 100.0, 2.0)]);
    let new = result(&[("deserialize", 99.0, 2.0)]);
    let report = compare_results(&previous, &new).expect("comparison succeeds");
    assert!(report.regressions.is_empty());
}

#[test]
fn an_improvement_is_never_a_regression() {
    let previous = result(&[("serialize", 100.0, 1.0)]);
    let new = result(&[("serialize", 130.0, 1.0)]);
    let report = compare_results(&previous, &new).expect("comparison succeeds");
    assert_eq!(report.relative_difference["serialize"], 0.3);
    assert!(report.regressions.is_empty());
}

#[test]
fn only_offending_metrics_are_reported() {
    let previous = result(&[("read", 100.0, 1.0), ("write", 200.0, 1.0)]);
    let new = result(&[("read", 50.0, 1.0), ("write", 199.0, 1.0)]);
    let report = compare_results(&previous, &new).expect("comparison succeeds");
    assert_eq!(report.regressions.len(), 1);
    assert!(report.regressions.contains_key("read"));
}

#[test]
fn missing_metric_is_an_error() {
    let previous = result(&[("read", 100.0, 1.0)]);
    let new = result(&[("write", 100.0, 1.0)]);
    let err = relative_differences(&previous, &new).unwrap_err();
    assert!(matches!(err, EvalError::MissingMetric(metric) if metric == "read"));
}

#[test]
fn zero_baseline_is_an_error() {
    let previous = result(&[("read", 0.0, 1.0)]);
    let new = result(&[("read", 10.0, 1.0)]);
    let err = relative_differences(&previous, &new).unwrap_err();
    assert!(matches!(err, EvalError::ZeroBaseline(metric) if metric == "read"));
}

#[test]
fn results_deserialize_from_a_plain_metric_map() {
    let parsed: BenchmarkResult =
        serde_json::from_str(r#"{"deserialize": {"score": 12.5, "error": 0.5}, "serialize": {"score": 8.0}}"#)
            .expect("result parses");
    assert_eq!(parsed.scores["deserialize"].score, 12.5);
    // Missing error margins default to zero.
    assert_eq!(parsed.scores["serialize"].error, 0.0);
}

#[test]
fn detection_ignores_metrics_without_thresholds() {
    let mut thresholds = BTreeMap::new();
    thresholds.insert("read".to_string(), -0.05);
    let mut differences = BTreeMap::new();
    differences.insert("read".to_string(), -0.2);
    differences.insert("write".to_string(), -0.9);
    let regressions = detect_regressions(&thresholds, &differences);
    assert_eq!(regressions.len(), 1);
    assert_eq!(regressions["read"], -0.2);
}
