use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::EvalError;

/// One benchmark metric: the measured score and its reported error band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricScore {
    pub score: f64,
    #[serde(default)]
    pub error: f64,
}

/// A benchmark run: metric name to score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BenchmarkResult {
    pub scores: BTreeMap<String, MetricScore>,
}

/// Comparison of two benchmark runs over the same metric set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Absolute score change per metric, `new - previous`.
    pub score_difference: BTreeMap<String, f64>,
    /// Relative score change per metric, `(new - previous) / previous`.
    pub relative_difference: BTreeMap<String, f64>,
    /// Metrics whose relative change fell below the noise threshold,
    /// with the offending relative difference.
    pub regressions: BTreeMap<String, f64>,
}

pub fn load_result(path: &Path) -> Result<BenchmarkResult, EvalError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

pub fn relative_differences(
    previous: &BenchmarkResult,
    new: &BenchmarkResult,
) -> Result<BTreeMap<String, f64>, EvalError> {
    let mut differences = BTreeMap::new();
    for (metric, before) in &previous.scores {
        let after = new
            .scores
            .get(metric)
            .ok_or_else(|| EvalError::MissingMetric(metric.clone()))?;
        if before.score == 0.0 {
            return Err(EvalError::ZeroBaseline(metric.clone()));
        }
        differences.insert(metric.clone(), (after.score - before.score) / before.score);
    }
    Ok(differences)
}

/// Per-metric noise band derived from the error margins of both runs,
/// expressed as the largest relative drop attributable to measurement
/// noise alone.
pub fn threshold_map(
    previous: &BenchmarkResult,
    new: &BenchmarkResult,
) -> Result<BTreeMap<String, f64>, EvalError> {
    let mut thresholds = BTreeMap::new();
    for (metric, before) in &previous.scores {
        let after = new
            .scores
            .get(metric)
            .ok_or_else(|| EvalError::MissingMetric(metric.clone()))?;
        if before.score == 0.0 {
            return Err(EvalError::ZeroBaseline(metric.clone()));
        }
        let band = (before.error.abs() + after.error.abs()) / before.score.abs();
        thresholds.insert(metric.clone(), -band);
    }
    Ok(thresholds)
}

/// A regression is a relative drop that exceeds the noise band of the
/// two runs.
pub fn detect_regressions(
    thresholds: &BTreeMap<String, f64>,
    differences: &BTreeMap<String, f64>,
) -> BTreeMap<String, f64> {
    let mut regressions = BTreeMap::new();
    for (metric, difference) in differences {
        if let Some(threshold) = thresholds.get(metric)
            && difference < threshold
        {
            regressions.insert(metric.clone(), *difference);
        }
    }
    regressions
}

pub fn compare_results(
    previous: &BenchmarkResult,
    new: &BenchmarkResult,
) -> Result<ComparisonReport, EvalError> {
    let mut score_difference = BTreeMap::new();
    for (metric, before) in &previous.scores {
        let after = new
            .scores
            .get(metric)
            .ok_or_else(|| EvalError::MissingMetric(metric.clone()))?;
        score_difference.insert(metric.clone(), after.score - before.score);
    }
    let relative_difference = relative_differences(previous, new)?;
    let thresholds = threshold_map(previous, new)?;
    let regressions = detect_regressions(&thresholds, &relative_difference);
    Ok(ComparisonReport {
        score_difference,
        relative_difference,
        regressions,
    })
}
