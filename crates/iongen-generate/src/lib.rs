//! Constraint-driven Ion value generation.
//!
//! This crate turns a normalized schema type into a stream of conforming
//! random values and drives emission toward a target byte size.

pub mod context;
pub mod engine;
pub mod errors;
pub mod generator;
pub mod model;
pub mod output;

pub use context::{DEFAULT_MAX_DEPTH, GenContext};
pub use engine::GenerationEngine;
pub use errors::GenerationError;
pub use generator::generate;
pub use model::{GenerateOptions, GenerationReport};
pub use output::{BinaryEncoder, CountingWriter, Encoder, Format, TextEncoder, encoder_for};
