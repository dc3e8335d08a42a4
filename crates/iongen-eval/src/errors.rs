use thiserror::Error;

/// Errors emitted when comparing benchmark results.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A metric present in one result is missing from the other.
    #[error("metric '{0}' is missing from one of the results")]
    MissingMetric(String),
    /// A previous score of zero makes the relative difference undefined.
    #[error("metric '{0}' has a zero baseline score")]
    ZeroBaseline(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
