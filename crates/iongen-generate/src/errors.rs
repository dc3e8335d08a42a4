use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The intersection of simultaneously declared bounds is empty.
    #[error("unsatisfiable constraints: {0}")]
    Unsatisfiable(String),
    /// one_of could not produce a value matching exactly one alternative
    /// within the retry budget.
    #[error("ambiguous one_of: {0}")]
    AmbiguousOneOf(String),
    #[error(transparent)]
    Schema(#[from] iongen_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
