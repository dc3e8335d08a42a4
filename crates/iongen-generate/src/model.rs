use serde::{Deserialize, Serialize};

use crate::context::DEFAULT_MAX_DEPTH;
use crate::output::Format;

/// Options for one generation session.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Requested approximate output size in bytes.
    pub target_bytes: u64,
    /// Wire format handed to the encoder.
    pub format: Format,
    /// Seed for reproducible output; process entropy when absent.
    pub seed: Option<u64>,
    /// Recursion bound for nested container types.
    pub max_depth: u32,
}

impl GenerateOptions {
    pub fn new(target_bytes: u64, format: Format) -> Self {
        Self {
            target_bytes,
            format,
            seed: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

/// Summary of a finished generation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub target_bytes: u64,
    pub bytes_written: u64,
    pub values_emitted: u64,
    pub batch_size: u64,
    pub duration_ms: u64,
}
