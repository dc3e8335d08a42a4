use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value as Json;

use crate::constraints::ConstraintSet;
use crate::error::{Error, Result};
use crate::types::IonType;

/// Raw shape of a type definition inside a schema document.
#[derive(Debug, Deserialize)]
struct RawTypeDefinition {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    type_tag: Option<String>,
    #[serde(default)]
    constraints: Option<serde_json::Map<String, Json>>,
}

/// A resolved schema type: an optional Ion type tag plus its normalized
/// constraint set. Combinator-only definitions carry no tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub name: Option<String>,
    pub type_tag: Option<IonType>,
    pub constraints: ConstraintSet,
}

impl TypeDefinition {
    pub fn from_json(value: &Json) -> Result<Self> {
        let raw: RawTypeDefinition = serde_json::from_value(value.clone())?;
        let type_tag = raw
            .type_tag
            .as_deref()
            .map(IonType::from_str)
            .transpose()?;
        let constraints = match &raw.constraints {
            Some(map) => ConstraintSet::from_raw(map)?,
            None => ConstraintSet::default(),
        };
        let constraints = match type_tag {
            Some(tag) => constraints.align_values(tag)?,
            None => constraints,
        };
        let definition = Self {
            name: raw.name,
            type_tag,
            constraints,
        };
        if definition.type_tag.is_none()
            && definition.constraints.any_of().is_none()
            && definition.constraints.one_of().is_none()
        {
            return Err(Error::InvalidSchema(
                "type definition needs a type tag or a logical combinator".to_string(),
            ));
        }
        // contains is a sequence-membership rule; structs are keyed by
        // field name instead.
        if definition.type_tag == Some(IonType::Struct)
            && definition.constraints.contains().is_some()
        {
            return Err(Error::shape(
                "contains",
                "contains applies to list and sexp containers only",
            ));
        }
        Ok(definition)
    }

    /// Bare definition for an Ion type with no constraints.
    pub fn of(type_tag: IonType) -> Self {
        Self {
            name: None,
            type_tag: Some(type_tag),
            constraints: ConstraintSet::default(),
        }
    }
}

/// Load the single type definition of a schema document.
pub fn load_schema(path: &Path) -> Result<TypeDefinition> {
    let text = std::fs::read_to_string(path)?;
    parse_schema(&text)
}

pub fn parse_schema(text: &str) -> Result<TypeDefinition> {
    let document: Json = serde_json::from_str(text)?;
    TypeDefinition::from_json(&document)
}
