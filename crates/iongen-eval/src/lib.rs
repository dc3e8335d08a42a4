//! Benchmark-result comparison and regression detection.
//!
//! Compares two benchmark score maps from different revisions, computes
//! per-metric relative differences, and flags metrics that fall beyond
//! the noise band of the two runs.

pub mod compare;
pub mod errors;

pub use compare::{
    BenchmarkResult, ComparisonReport, MetricScore, compare_results, detect_regressions,
    load_result, relative_differences, threshold_map,
};
pub use errors::EvalError;
