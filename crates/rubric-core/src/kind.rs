//! # Value Kinds
//!
//! `Kind` names the runtime shape of a [`Value`](crate::Value). A bare `Kind`
//! used as a schema is a type reference: it accepts exactly the values of
//! that kind and nothing else.
//!
//! ## Invariant
//!
//! Kind matching is exact. There is no numeric widening (`Int` is never a
//! `Float`) and `Bool` is not a subtype of `Int`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The runtime kind of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    List,
    Tuple,
    Set,
    Dict,
}

/// Every kind, in ordering rank.
pub const ALL_KINDS: [Kind; 10] = [
    Kind::Null,
    Kind::Bool,
    Kind::Int,
    Kind::Float,
    Kind::Str,
    Kind::Bytes,
    Kind::List,
    Kind::Tuple,
    Kind::Set,
    Kind::Dict,
];

impl Kind {
    /// Short lowercase name, as used in error messages and schema documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bytes => "bytes",
            Self::List => "list",
            Self::Tuple => "tuple",
            Self::Set => "set",
            Self::Dict => "dict",
        }
    }

    /// True for the leaf kinds (everything except the four collections).
    pub fn is_scalar(&self) -> bool {
        !self.is_collection()
    }

    /// True for `List`, `Tuple`, `Set` and `Dict`.
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::List | Self::Tuple | Self::Set | Self::Dict)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a kind name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown kind '{0}'")]
pub struct UnknownKind(pub String);

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_KINDS
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}
