use thiserror::Error;

/// Core error type shared across iongen crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A constraint payload does not have the shape its kind requires.
    #[error("invalid constraint '{constraint}': {message}")]
    SchemaShape { constraint: String, message: String },
    /// A declared constraint kind has no generator and no safe default.
    #[error("unsupported constraint: {0}")]
    UnsupportedConstraint(String),
    /// The schema document violates structural invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn shape(constraint: &str, message: impl Into<String>) -> Self {
        Error::SchemaShape {
            constraint: constraint.to_string(),
            message: message.into(),
        }
    }
}

/// Convenience alias for results returned by iongen crates.
pub type Result<T> = std::result::Result<T, Error>;
