use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::types::IonType;

/// Exact decimal as coefficient * 10^exponent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decimal {
    pub coefficient: i64,
    pub exponent: i32,
}

impl Decimal {
    pub fn new(coefficient: i64, exponent: i32) -> Self {
        Self {
            coefficient,
            exponent,
        }
    }

    pub fn to_f64(self) -> f64 {
        self.coefficient as f64 * 10_f64.powi(self.exponent)
    }

    /// Number of digits in the coefficient, per the precision constraint.
    pub fn precision(self) -> u64 {
        let mut value = self.coefficient.unsigned_abs();
        let mut digits = 1;
        while value >= 10 {
            value /= 10;
            digits += 1;
        }
        digits
    }
}

/// A constructed Ion value, without annotations.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Timestamp(DateTime<Utc>),
    String(String),
    Symbol(String),
    Blob(Vec<u8>),
    Clob(Vec<u8>),
    List(Vec<Element>),
    Sexp(Vec<Element>),
    Struct(Vec<(String, Element)>),
}

/// A value plus its annotation list; the unit the generator emits.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub annotations: Vec<String>,
    pub value: Value,
}

impl Element {
    pub fn new(value: Value) -> Self {
        Self {
            annotations: Vec::new(),
            value,
        }
    }

    pub fn annotated(annotations: Vec<String>, value: Value) -> Self {
        Self { annotations, value }
    }

    pub fn ion_type(&self) -> IonType {
        match &self.value {
            Value::Null => IonType::Null,
            Value::Bool(_) => IonType::Bool,
            Value::Int(_) => IonType::Int,
            Value::Float(_) => IonType::Float,
            Value::Decimal(_) => IonType::Decimal,
            Value::Timestamp(_) => IonType::Timestamp,
            Value::String(_) => IonType::String,
            Value::Symbol(_) => IonType::Symbol,
            Value::Blob(_) => IonType::Blob,
            Value::Clob(_) => IonType::Clob,
            Value::List(_) => IonType::List,
            Value::Sexp(_) => IonType::Sexp,
            Value::Struct(_) => IonType::Struct,
        }
    }

    /// Children of a container element, empty for scalars.
    pub fn children(&self) -> &[Element] {
        match &self.value {
            Value::List(items) | Value::Sexp(items) => items,
            _ => &[],
        }
    }

    /// Numeric view used by range constraints.
    pub fn as_f64(&self) -> Option<f64> {
        match &self.value {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            Value::Decimal(value) => Some(value.to_f64()),
            Value::Timestamp(value) => Some(value.timestamp() as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            Value::String(value) | Value::Symbol(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Align a user-declared value with the declared type tag, so the
    /// generator and the validator see the same representation.
    pub fn coerce_to(self, tag: IonType) -> Result<Self> {
        let Element { annotations, value } = self;
        let value = match (tag, value) {
            (IonType::Symbol, Value::String(text)) => Value::Symbol(text),
            (IonType::String, Value::Symbol(text)) => Value::String(text),
            (IonType::Float, Value::Int(value)) => Value::Float(value as f64),
            (IonType::Decimal, Value::Int(value)) => Value::Decimal(Decimal::new(value, 0)),
            (IonType::Decimal, Value::Float(value)) => Value::Decimal(decimal_from_f64(value)),
            (IonType::Timestamp, Value::String(text)) => {
                let instant = DateTime::parse_from_rfc3339(&text)
                    .map_err(|err| {
                        Error::shape(
                            "valid_values",
                            format!("invalid timestamp '{text}': {err}"),
                        )
                    })?
                    .with_timezone(&Utc);
                Value::Timestamp(instant)
            }
            (IonType::Blob, Value::String(text)) => Value::Blob(text.into_bytes()),
            (IonType::Clob, Value::String(text)) => Value::Clob(text.into_bytes()),
            (_, value) => value,
        };
        Ok(Element::annotated(annotations, value))
    }

    /// Convert a JSON scalar or container into an element. Used for
    /// user-declared values inside `contains` and `valid_values`.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let value = match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(value) => Value::Bool(*value),
            serde_json::Value::Number(number) => {
                if let Some(value) = number.as_i64() {
                    Value::Int(value)
                } else {
                    Value::Float(number.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(value) => Value::String(value.clone()),
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(Element::from_json).collect())
            }
            serde_json::Value::Object(fields) => Value::Struct(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), Element::from_json(value)))
                    .collect(),
            ),
        };
        Element::new(value)
    }
}

/// Structural equality with the leniency user-declared values need:
/// ints match floats and decimals of equal magnitude, strings match
/// symbols with equal text. Annotations are ignored.
pub fn values_match(left: &Element, right: &Element) -> bool {
    match (&left.value, &right.value) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        // Exact int comparison; the numeric fallthrough loses precision
        // above 2^53.
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::String(a) | Value::Symbol(a), Value::String(b) | Value::Symbol(b)) => a == b,
        (Value::Blob(a), Value::Blob(b)) | (Value::Clob(a), Value::Clob(b)) => a == b,
        (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
        (Value::List(a), Value::List(b)) | (Value::Sexp(a), Value::Sexp(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_match(x, y))
        }
        (Value::Struct(a), Value::Struct(b)) => {
            a.len() == b.len()
                && a.iter().all(|(name, value)| {
                    b.iter()
                        .any(|(other, candidate)| other == name && values_match(value, candidate))
                })
        }
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

fn decimal_from_f64(value: f64) -> Decimal {
    for scale in 0..=9_i32 {
        let scaled = value * 10_f64.powi(scale);
        if scaled.fract() == 0.0 && scaled.abs() < i64::MAX as f64 {
            return Decimal::new(scaled as i64, -scale);
        }
    }
    let scaled = (value * 1.0e6).round();
    Decimal::new(scaled as i64, -6)
}
