use chrono::{DateTime, Utc};
use serde_json::Value as Json;

use crate::error::{Error, Result};
use crate::schema::TypeDefinition;
use crate::types::IonType;
use crate::value::Element;

/// Inclusive-or-exclusive numeric bound pair. Timestamp bounds are folded
/// into epoch seconds during normalization so one range shape serves every
/// ordered scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_exclusive: bool,
    pub max_exclusive: bool,
}

impl NumericRange {
    pub fn contains(&self, value: f64) -> bool {
        if let Some(min) = self.min {
            if value < min || (self.min_exclusive && value == min) {
                return false;
            }
        }
        if let Some(max) = self.max {
            if value > max || (self.max_exclusive && value == max) {
                return false;
            }
        }
        true
    }
}

/// Length bound on text, lob, and container sizes. Declared either as an
/// exact count or as a `{min, max}` object.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LengthRange {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl LengthRange {
    pub fn exact(value: u64) -> Self {
        Self {
            min: Some(value),
            max: Some(value),
        }
    }

    pub fn contains(&self, length: u64) -> bool {
        self.min.is_none_or(|min| length >= min) && self.max.is_none_or(|max| length <= max)
    }

    /// Intersection of two declared ranges; a missing bound defers to
    /// the other side.
    pub fn intersect(self, other: LengthRange) -> LengthRange {
        let min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        let max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        LengthRange { min, max }
    }

    /// Resolve against implementation defaults; `None` when the declared
    /// bounds are contradictory.
    pub fn resolve(&self, default_min: u64, default_max: u64) -> Option<(u64, u64)> {
        let min = self.min.unwrap_or(default_min);
        let max = self.max.unwrap_or(default_max.max(min));
        if min > max { None } else { Some((min, max)) }
    }
}

/// Acceptable-value declaration: an explicit set or a numeric range.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidValues {
    Set(Vec<Element>),
    Range(NumericRange),
}

/// One normalized constraint. Closed variant set so the generator and the
/// validator dispatch exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    ValidValues(ValidValues),
    ContainerLength(LengthRange),
    CodepointLength(LengthRange),
    ByteLength(LengthRange),
    Precision(LengthRange),
    Contains(Vec<Element>),
    Element(Box<TypeDefinition>),
    Fields(Vec<(String, TypeDefinition)>),
    Annotations(Vec<String>),
    AnyOf(Vec<TypeDefinition>),
    OneOf(Vec<TypeDefinition>),
    Not(Box<TypeDefinition>),
}

/// Normalized view of one schema type's constraint declarations.
/// Immutable once derived; recursion into nested types re-derives child
/// sets rather than mutating this one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn from_raw(raw: &serde_json::Map<String, Json>) -> Result<Self> {
        let mut constraints = Vec::with_capacity(raw.len());
        for (name, payload) in raw {
            constraints.push(parse_constraint(name, payload)?);
        }
        Ok(Self { constraints })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    /// Coerce declared value-set members to the type tag once, at
    /// normalization time, so generation and validation agree on their
    /// representation.
    pub(crate) fn align_values(mut self, tag: IonType) -> Result<Self> {
        for constraint in &mut self.constraints {
            if let Constraint::ValidValues(ValidValues::Set(members)) = constraint {
                *members = std::mem::take(members)
                    .into_iter()
                    .map(|member| member.coerce_to(tag))
                    .collect::<Result<Vec<_>>>()?;
            }
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn valid_values(&self) -> Option<&ValidValues> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::ValidValues(values) => Some(values),
            _ => None,
        })
    }

    pub fn container_length(&self) -> Option<LengthRange> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::ContainerLength(range) => Some(*range),
            _ => None,
        })
    }

    pub fn codepoint_length(&self) -> Option<LengthRange> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::CodepointLength(range) => Some(*range),
            _ => None,
        })
    }

    pub fn byte_length(&self) -> Option<LengthRange> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::ByteLength(range) => Some(*range),
            _ => None,
        })
    }

    pub fn precision(&self) -> Option<LengthRange> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::Precision(range) => Some(*range),
            _ => None,
        })
    }

    pub fn contains(&self) -> Option<&[Element]> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::Contains(members) => Some(members.as_slice()),
            _ => None,
        })
    }

    pub fn element(&self) -> Option<&TypeDefinition> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::Element(def) => Some(def.as_ref()),
            _ => None,
        })
    }

    pub fn fields(&self) -> Option<&[(String, TypeDefinition)]> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::Fields(fields) => Some(fields.as_slice()),
            _ => None,
        })
    }

    pub fn annotations(&self) -> Option<&[String]> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::Annotations(annotations) => Some(annotations.as_slice()),
            _ => None,
        })
    }

    pub fn any_of(&self) -> Option<&[TypeDefinition]> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::AnyOf(branches) => Some(branches.as_slice()),
            _ => None,
        })
    }

    pub fn one_of(&self) -> Option<&[TypeDefinition]> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::OneOf(branches) => Some(branches.as_slice()),
            _ => None,
        })
    }

    pub fn not(&self) -> Option<&TypeDefinition> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::Not(def) => Some(def.as_ref()),
            _ => None,
        })
    }
}

fn parse_constraint(name: &str, payload: &Json) -> Result<Constraint> {
    match name {
        "valid_values" => Ok(Constraint::ValidValues(parse_valid_values(name, payload)?)),
        "container_length" => Ok(Constraint::ContainerLength(parse_length(name, payload)?)),
        "codepoint_length" => Ok(Constraint::CodepointLength(parse_length(name, payload)?)),
        "byte_length" => Ok(Constraint::ByteLength(parse_length(name, payload)?)),
        "precision" => Ok(Constraint::Precision(parse_length(name, payload)?)),
        "contains" => {
            let members = payload
                .as_array()
                .ok_or_else(|| Error::shape(name, "expected a sequence of required members"))?;
            Ok(Constraint::Contains(
                members.iter().map(Element::from_json).collect(),
            ))
        }
        "element" => Ok(Constraint::Element(Box::new(TypeDefinition::from_json(
            payload,
        )?))),
        "fields" => {
            let fields = payload
                .as_object()
                .ok_or_else(|| Error::shape(name, "expected an object of field definitions"))?;
            let mut parsed = Vec::with_capacity(fields.len());
            for (field_name, field_def) in fields {
                parsed.push((field_name.clone(), TypeDefinition::from_json(field_def)?));
            }
            Ok(Constraint::Fields(parsed))
        }
        "annotations" => {
            let annotations = payload
                .as_array()
                .ok_or_else(|| Error::shape(name, "expected a sequence of annotation symbols"))?;
            let mut parsed = Vec::with_capacity(annotations.len());
            for annotation in annotations {
                let text = annotation
                    .as_str()
                    .ok_or_else(|| Error::shape(name, "annotations must be strings"))?;
                parsed.push(text.to_string());
            }
            Ok(Constraint::Annotations(parsed))
        }
        "any_of" => Ok(Constraint::AnyOf(parse_branches(name, payload)?)),
        "one_of" => Ok(Constraint::OneOf(parse_branches(name, payload)?)),
        "not" => Ok(Constraint::Not(Box::new(TypeDefinition::from_json(
            payload,
        )?))),
        other => Err(Error::UnsupportedConstraint(other.to_string())),
    }
}

fn parse_branches(name: &str, payload: &Json) -> Result<Vec<TypeDefinition>> {
    let branches = payload
        .as_array()
        .ok_or_else(|| Error::shape(name, "expected a sequence of alternative types"))?;
    if branches.is_empty() {
        return Err(Error::shape(name, "at least one alternative is required"));
    }
    branches.iter().map(TypeDefinition::from_json).collect()
}

fn parse_valid_values(name: &str, payload: &Json) -> Result<ValidValues> {
    match payload {
        Json::Array(values) => {
            if values.is_empty() {
                return Err(Error::shape(name, "value set must not be empty"));
            }
            Ok(ValidValues::Set(
                values.iter().map(Element::from_json).collect(),
            ))
        }
        Json::Object(_) => Ok(ValidValues::Range(parse_range(name, payload)?)),
        _ => Err(Error::shape(
            name,
            "expected a value set or a range object",
        )),
    }
}

fn parse_range(name: &str, payload: &Json) -> Result<NumericRange> {
    let object = payload
        .as_object()
        .ok_or_else(|| Error::shape(name, "expected a range object"))?;
    for key in object.keys() {
        if !matches!(
            key.as_str(),
            "min" | "max" | "min_exclusive" | "max_exclusive"
        ) {
            return Err(Error::shape(name, format!("unknown range field '{key}'")));
        }
    }
    let min = object
        .get("min")
        .map(|bound| parse_bound(name, bound))
        .transpose()?;
    let max = object
        .get("max")
        .map(|bound| parse_bound(name, bound))
        .transpose()?;
    let min_exclusive = parse_flag(name, object.get("min_exclusive"))?;
    let max_exclusive = parse_flag(name, object.get("max_exclusive"))?;
    Ok(NumericRange {
        min,
        max,
        min_exclusive,
        max_exclusive,
    })
}

fn parse_flag(name: &str, value: Option<&Json>) -> Result<bool> {
    match value {
        None => Ok(false),
        Some(Json::Bool(flag)) => Ok(*flag),
        Some(_) => Err(Error::shape(name, "exclusivity flags must be booleans")),
    }
}

/// A bound is a number, or an RFC 3339 timestamp folded to epoch seconds.
fn parse_bound(name: &str, value: &Json) -> Result<f64> {
    match value {
        Json::Number(number) => number
            .as_f64()
            .ok_or_else(|| Error::shape(name, "bound is not a representable number")),
        Json::String(text) => {
            let parsed: DateTime<Utc> = DateTime::parse_from_rfc3339(text)
                .map_err(|err| Error::shape(name, format!("invalid timestamp bound: {err}")))?
                .with_timezone(&Utc);
            Ok(parsed.timestamp() as f64)
        }
        _ => Err(Error::shape(name, "bounds must be numbers or timestamps")),
    }
}

fn parse_length(name: &str, payload: &Json) -> Result<LengthRange> {
    match payload {
        Json::Number(number) => {
            let exact = number
                .as_u64()
                .ok_or_else(|| Error::shape(name, "length must be a non-negative integer"))?;
            Ok(LengthRange::exact(exact))
        }
        Json::Object(object) => {
            for key in object.keys() {
                if !matches!(key.as_str(), "min" | "max") {
                    return Err(Error::shape(name, format!("unknown length field '{key}'")));
                }
            }
            let min = object
                .get("min")
                .map(|value| {
                    value.as_u64().ok_or_else(|| {
                        Error::shape(name, "length min must be a non-negative integer")
                    })
                })
                .transpose()?;
            let max = object
                .get("max")
                .map(|value| {
                    value.as_u64().ok_or_else(|| {
                        Error::shape(name, "length max must be a non-negative integer")
                    })
                })
                .transpose()?;
            Ok(LengthRange { min, max })
        }
        _ => Err(Error::shape(
            name,
            "expected an exact length or a {min, max} object",
        )),
    }
}
