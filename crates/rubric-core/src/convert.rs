//! # Document Conversion
//!
//! Converts parsed JSON and YAML trees into [`Value`]s so that documents read
//! from disk can be validated.
//!
//! - JSON objects become dicts keyed by strings; integral numbers become
//!   `Int` (u64 values above `i64::MAX` fall back to `Float`), every other
//!   number becomes `Float`.
//! - YAML mappings keep the scalar kind of their keys: the key `1` is
//!   `Int(1)`, not `"1"`. Tags are ignored and the inner value converted.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::value::Value;

/// Error converting a parsed document into a [`Value`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// A YAML number that is neither an integer nor a float.
    #[error("unsupported YAML number: {0}")]
    UnsupportedNumber(String),
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    n.as_f64()
                        .map_or_else(|| Value::Str(n.to_string()), Value::Float)
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Dict(
                map.into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<serde_yaml::Value> for Value {
    type Error = ConversionError;

    fn try_from(yaml: serde_yaml::Value) -> Result<Self, Self::Error> {
        match yaml {
            serde_yaml::Value::Null => Ok(Value::Null),
            serde_yaml::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err(ConversionError::UnsupportedNumber(n.to_string()))
                }
            }
            serde_yaml::Value::String(s) => Ok(Value::Str(s)),
            serde_yaml::Value::Sequence(seq) => {
                let items: Result<Vec<Value>, _> =
                    seq.into_iter().map(Value::try_from).collect();
                Ok(Value::List(items?))
            }
            serde_yaml::Value::Mapping(map) => {
                let mut out = BTreeMap::new();
                for (k, v) in map {
                    out.insert(Value::try_from(k)?, Value::try_from(v)?);
                }
                Ok(Value::Dict(out))
            }
            serde_yaml::Value::Tagged(tagged) => Value::try_from(tagged.value),
        }
    }
}
