use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::errors::GenerationError;

/// Nesting bound for self-referential schemas.
pub const DEFAULT_MAX_DEPTH: u32 = 32;

/// State threaded through every generation call: the random source and
/// the recursion-depth counter. Never ambient, never shared.
#[derive(Debug)]
pub struct GenContext {
    pub rng: ChaCha8Rng,
    depth: u32,
    max_depth: u32,
}

impl GenContext {
    /// Seeded contexts reproduce byte-identical output; unseeded ones
    /// draw from process entropy.
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_max_depth(seed, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(seed: Option<u64>, max_depth: u32) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self {
            rng,
            depth: 0,
            max_depth,
        }
    }

    pub fn enter(&mut self) -> Result<(), GenerationError> {
        if self.depth >= self.max_depth {
            return Err(GenerationError::Unsatisfiable(format!(
                "schema nesting exceeds the depth bound of {}",
                self.max_depth
            )));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
