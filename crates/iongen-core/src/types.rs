use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Closed set of Ion type tags a schema type can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IonType {
    Null,
    Bool,
    Int,
    Float,
    Decimal,
    Timestamp,
    String,
    Symbol,
    Blob,
    Clob,
    List,
    Sexp,
    Struct,
}

impl IonType {
    pub fn name(self) -> &'static str {
        match self {
            IonType::Null => "null",
            IonType::Bool => "bool",
            IonType::Int => "int",
            IonType::Float => "float",
            IonType::Decimal => "decimal",
            IonType::Timestamp => "timestamp",
            IonType::String => "string",
            IonType::Symbol => "symbol",
            IonType::Blob => "blob",
            IonType::Clob => "clob",
            IonType::List => "list",
            IonType::Sexp => "sexp",
            IonType::Struct => "struct",
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, IonType::List | IonType::Sexp | IonType::Struct)
    }

    pub fn is_text(self) -> bool {
        matches!(self, IonType::String | IonType::Symbol)
    }

    pub fn is_lob(self) -> bool {
        matches!(self, IonType::Blob | IonType::Clob)
    }
}

impl fmt::Display for IonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IonType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "null" => Ok(IonType::Null),
            "bool" => Ok(IonType::Bool),
            "int" => Ok(IonType::Int),
            "float" => Ok(IonType::Float),
            "decimal" => Ok(IonType::Decimal),
            "timestamp" => Ok(IonType::Timestamp),
            "string" => Ok(IonType::String),
            "symbol" => Ok(IonType::Symbol),
            "blob" => Ok(IonType::Blob),
            "clob" => Ok(IonType::Clob),
            "list" => Ok(IonType::List),
            "sexp" => Ok(IonType::Sexp),
            "struct" => Ok(IonType::Struct),
            other => Err(Error::InvalidSchema(format!(
                "unknown type tag '{other}'"
            ))),
        }
    }
}
