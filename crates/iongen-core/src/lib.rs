//! Core contracts for iongen.
//!
//! This crate defines the Ion value model, the normalized constraint
//! model, schema document loading, and the independent validator shared
//! by the generator and its tests.

pub mod constraints;
pub mod error;
pub mod schema;
pub mod types;
pub mod validation;
pub mod value;

pub use constraints::{Constraint, ConstraintSet, LengthRange, NumericRange, ValidValues};
pub use error::{Error, Result};
pub use schema::{TypeDefinition, load_schema, parse_schema};
pub use types::IonType;
pub use validation::{Violation, matching_branches, validate};
pub use value::{Decimal, Element, Value, values_match};
