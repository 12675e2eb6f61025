//! # Schema Descriptions
//!
//! [`Schema`] is the closed union of every shape a schema can take. The
//! dispatcher matches on it explicitly instead of probing capabilities:
//!
//! | Variant | Meaning |
//! |---|---|
//! | `Type(kind)` | bare type reference, accepts values of exactly `kind` |
//! | `Node(node)` | built-in [`SchemaNode`] |
//! | `Custom(v)` | user validator implementing [`Validate`] |
//! | `Dict`/`List`/`Tuple`/`Set` | raw collection used as a structural template |
//! | `Literal(v)` | exact-match literal |
//!
//! A `Literal` holding a collection value is treated like the matching raw
//! template whose children are literals.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rubric_core::{Kind, ValidateError, Value};

use crate::node::{check_fields, check_items, SchemaNode};

/// The shared validation capability.
///
/// Implement this to plug a custom validator into a schema tree via
/// [`Schema::custom`]. Implementations must not mutate shared state; the
/// same validator may run on several threads at once.
pub trait Validate: fmt::Debug + Send + Sync {
    /// Check `value`, returning the first violation found.
    fn validate(&self, value: &Value) -> Result<(), ValidateError>;

    /// Default that makes this validator's key optional inside a dict.
    fn default_value(&self) -> Option<&Value> {
        None
    }
}

/// A schema description.
#[derive(Debug, Clone)]
pub enum Schema {
    Type(Kind),
    Node(SchemaNode),
    Custom(Arc<dyn Validate>),
    Dict(BTreeMap<Value, Schema>),
    List(Vec<Schema>),
    Tuple(Vec<Schema>),
    Set(Vec<Schema>),
    Literal(Value),
}

/// Which dispatch branch a schema takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaForm {
    Type,
    Node,
    Custom,
    Raw,
    Literal,
}

impl SchemaForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Node => "node",
            Self::Custom => "custom",
            Self::Raw => "raw",
            Self::Literal => "literal",
        }
    }
}

impl fmt::Display for SchemaForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Schema {
    /// A raw dict template.
    pub fn dict<K: Into<Value>>(fields: impl IntoIterator<Item = (K, Schema)>) -> Self {
        Self::Dict(fields.into_iter().map(|(k, s)| (k.into(), s)).collect())
    }

    /// A raw list template.
    pub fn list(items: impl IntoIterator<Item = Schema>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// A raw tuple template.
    pub fn tuple(items: impl IntoIterator<Item = Schema>) -> Self {
        Self::Tuple(items.into_iter().collect())
    }

    /// A raw set template.
    pub fn set(items: impl IntoIterator<Item = Schema>) -> Self {
        Self::Set(items.into_iter().collect())
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn custom(validator: impl Validate + 'static) -> Self {
        Self::Custom(Arc::new(validator))
    }

    pub fn form(&self) -> SchemaForm {
        match self {
            Self::Type(_) => SchemaForm::Type,
            Self::Node(_) => SchemaForm::Node,
            Self::Custom(_) => SchemaForm::Custom,
            Self::Dict(_) | Self::List(_) | Self::Tuple(_) | Self::Set(_) => SchemaForm::Raw,
            Self::Literal(v) if v.is_collection() => SchemaForm::Raw,
            Self::Literal(_) => SchemaForm::Literal,
        }
    }

    /// The default this schema carries, if it can carry one at all.
    pub fn default_value(&self) -> Option<&Value> {
        match self {
            Self::Node(node) => node.default_value(),
            Self::Custom(custom) => custom.default_value(),
            _ => None,
        }
    }

    /// Validate `value` against this schema.
    pub fn validate<'v>(&self, value: &'v Value) -> Result<&'v Value, ValidateError> {
        crate::validate::validate(self, value)
    }

    /// Report the first malformed sequence pattern in this schema tree.
    ///
    /// Tuple and set items are not checked since validation never reads
    /// them. Custom validators are opaque and always pass.
    pub fn check(&self) -> Result<(), ValidateError> {
        match self {
            Self::Type(_) | Self::Custom(_) | Self::Tuple(_) | Self::Set(_) => Ok(()),
            Self::Node(node) => node.check(),
            Self::Dict(fields) => check_fields(fields),
            Self::List(items) => check_items(items),
            Self::Literal(v) if v.is_collection() => Self::lift(v).check(),
            Self::Literal(_) => Ok(()),
        }
    }

    /// Turn a collection literal into the raw template it stands for.
    /// Scalars stay literals.
    pub(crate) fn lift(value: &Value) -> Self {
        let literals = |items: &[Value]| -> Vec<Schema> {
            items.iter().cloned().map(Self::Literal).collect()
        };
        match value {
            Value::List(items) => Self::List(literals(items)),
            Value::Tuple(items) => Self::Tuple(literals(items)),
            Value::Set(items) => Self::Set(items.iter().cloned().map(Self::Literal).collect()),
            Value::Dict(map) => Self::Dict(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::Literal(v.clone())))
                    .collect(),
            ),
            scalar => Self::Literal(scalar.clone()),
        }
    }
}

impl From<Kind> for Schema {
    fn from(kind: Kind) -> Self {
        Self::Type(kind)
    }
}

impl From<SchemaNode> for Schema {
    fn from(node: SchemaNode) -> Self {
        Self::Node(node)
    }
}

impl From<Value> for Schema {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<bool> for Schema {
    fn from(b: bool) -> Self {
        Self::Literal(Value::from(b))
    }
}

impl From<i64> for Schema {
    fn from(i: i64) -> Self {
        Self::Literal(Value::from(i))
    }
}

impl From<i32> for Schema {
    fn from(i: i32) -> Self {
        Self::Literal(Value::from(i))
    }
}

impl From<f64> for Schema {
    fn from(f: f64) -> Self {
        Self::Literal(Value::from(f))
    }
}

impl From<&str> for Schema {
    fn from(s: &str) -> Self {
        Self::Literal(Value::from(s))
    }
}

impl From<String> for Schema {
    fn from(s: String) -> Self {
        Self::Literal(Value::from(s))
    }
}
