//! # Dynamic Values
//!
//! `Value` is the input side of every validation. It is deliberately small:
//! six scalar variants, one sequence, one mapping.
//!
//! ## Equality
//!
//! Equality is structural. Arrays compare element-wise and maps compare
//! key-by-key, recursively. Two rules differ from derived equality:
//!
//! 1. **Numbers compare by value.** `Integer(1) == Float(1.0)`. Literal sets
//!    written with `1` accept an input of `1.0` and vice versa.
//! 2. **Text and symbols never compare equal.** `"red"` and `:red` are
//!    different atoms even though they spell the same.
//!
//! ## Symbols in JSON and YAML
//!
//! Neither format has a symbol type. In JSON a single-key object
//! `{"$symbol": "name"}` denotes a symbol; in YAML the `!sym name` tag does.
//! Serialization writes symbols back in the JSON form.

use std::collections::BTreeMap;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::ConversionError;

/// Object key that marks a JSON object as a symbol.
pub const SYMBOL_KEY: &str = "$symbol";

/// YAML tag (without the leading `!`) that marks a string as a symbol.
pub const SYMBOL_TAG: &str = "sym";

/// A dynamically-typed input value.
#[derive(Debug, Clone)]
pub enum Value {
    /// The absence of a value. Matches no type tag.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// A floating-point number.
    Float(f64),
    /// A text string.
    Text(String),
    /// An atomic identifier.
    Symbol(String),
    /// An ordered sequence.
    Array(Vec<Value>),
    /// A mapping from keyword to value.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Construct a symbol.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// Construct a mapping from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Whether this value is a sequence or a mapping.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Map(_))
    }

    /// Whether this value is a mapping.
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// Short name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Symbol(_) => "symbol",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view of integers and floats alike.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The string content of a `Text` value. Symbols return `None`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Convert a YAML value tree.
    ///
    /// Map keys may be strings, numbers or booleans (stringified). A `!sym`
    /// tag on a string produces a symbol, as does the JSON-style
    /// `{"$symbol": name}` mapping. Any other tag is ignored and the inner
    /// value converted.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] for non-scalar map keys, unrepresentable
    /// numbers, or a `!sym` tag on something other than a string.
    pub fn from_yaml(yaml: &serde_yaml::Value) -> Result<Self, ConversionError> {
        match yaml {
            serde_yaml::Value::Null => Ok(Self::Null),
            serde_yaml::Value::Bool(b) => Ok(Self::Bool(*b)),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Float(f))
                } else {
                    Err(ConversionError::UnsupportedNumber(n.to_string()))
                }
            }
            serde_yaml::Value::String(s) => Ok(Self::Text(s.clone())),
            serde_yaml::Value::Sequence(seq) => {
                let items: Result<Vec<Value>, ConversionError> =
                    seq.iter().map(Self::from_yaml).collect();
                Ok(Self::Array(items?))
            }
            serde_yaml::Value::Mapping(mapping) => {
                if mapping.len() == 1 {
                    if let Some(serde_yaml::Value::String(name)) = mapping.get(SYMBOL_KEY) {
                        return Ok(Self::Symbol(name.clone()));
                    }
                }
                let mut map = BTreeMap::new();
                for (k, v) in mapping {
                    let key = match k {
                        serde_yaml::Value::String(s) => s.clone(),
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        other => {
                            return Err(ConversionError::UnsupportedKey(format!("{other:?}")))
                        }
                    };
                    map.insert(key, Self::from_yaml(v)?);
                }
                Ok(Self::Map(map))
            }
            serde_yaml::Value::Tagged(tagged) => {
                let tag = tagged.tag.to_string();
                if tag.trim_start_matches('!') == SYMBOL_TAG {
                    match &tagged.value {
                        serde_yaml::Value::String(s) => Ok(Self::Symbol(s.clone())),
                        other => Err(ConversionError::InvalidSymbol(format!("{other:?}"))),
                    }
                } else {
                    Self::from_yaml(&tagged.value)
                }
            }
        }
    }
}

/// Exact comparison: `f` must be integral, inside the `i64` range, and
/// equal to `i` without rounding `i` through `f64`.
fn integer_equals_float(i: i64, f: f64) -> bool {
    // i64::MIN is exactly -2^63; i64::MAX rounds up to 2^63 as f64.
    const LOWER: f64 = -9_223_372_036_854_775_808.0;
    f.fract() == 0.0 && (LOWER..-LOWER).contains(&f) && f as i64 == i
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Integer(a), Self::Float(b)) | (Self::Float(b), Self::Integer(a)) => {
                integer_equals_float(*a, *b)
            }
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self::Map(map)
    }
}

impl From<serde_json::Value> for Value {
    /// Convert a JSON value tree.
    ///
    /// Integers that fit in `i64` stay integers; everything else numeric
    /// becomes a float. `{"$symbol": "name"}` becomes a symbol.
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(object) => {
                if object.len() == 1 {
                    if let Some(serde_json::Value::String(name)) = object.get(SYMBOL_KEY) {
                        return Self::Symbol(name.clone());
                    }
                }
                Self::Map(
                    object
                        .into_iter()
                        .map(|(k, v)| (k, Self::from(v)))
                        .collect(),
                )
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Symbol(s) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(SYMBOL_KEY, s)?;
                map.end()
            }
            Self::Array(items) => items.serialize(serializer),
            Self::Map(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}
