//! # Primitive Type Tags
//!
//! The scalar types a rule can name. `Bool` is a tag in its own right, and
//! `Numeric` is the only tag that spans more than one value variant (it
//! accepts both integers and floats).
//!
//! No tag matches `Null`, arrays, or maps. Composite values are never an
//! instance of a primitive type.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DefinitionError;
use crate::value::Value;

/// A primitive scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    /// Any number, integer or float.
    Numeric,
    /// A whole number.
    Integer,
    /// A floating-point number.
    Float,
    /// `true` or `false`.
    Bool,
    /// A text string.
    Text,
    /// An atomic identifier.
    Symbol,
}

impl TypeTag {
    /// Returns all type tags in declaration order.
    pub fn all_tags() -> &'static [TypeTag] {
        &[
            Self::Numeric,
            Self::Integer,
            Self::Float,
            Self::Bool,
            Self::Text,
            Self::Symbol,
        ]
    }

    /// Returns the snake_case identifier for this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Text => "text",
            Self::Symbol => "symbol",
        }
    }

    /// Whether `value` is an instance of this type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Numeric => matches!(value, Value::Integer(_) | Value::Float(_)),
            Self::Integer => matches!(value, Value::Integer(_)),
            Self::Float => matches!(value, Value::Float(_)),
            Self::Bool => matches!(value, Value::Bool(_)),
            Self::Text => matches!(value, Value::Text(_)),
            Self::Symbol => matches!(value, Value::Symbol(_)),
        }
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = DefinitionError;

    /// Parse a type tag from its identifier.
    ///
    /// `string` and `boolean` are accepted as aliases of `text` and `bool`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "numeric" => Ok(Self::Numeric),
            "integer" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "bool" | "boolean" => Ok(Self::Bool),
            "text" | "string" => Ok(Self::Text),
            "symbol" => Ok(Self::Symbol),
            other => Err(DefinitionError::UnknownTypeTag(other.to_string())),
        }
    }
}
