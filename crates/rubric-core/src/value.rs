//! # Dynamic Value Model
//!
//! `Value` is the data a schema is validated against. It covers the scalar
//! kinds (null, bool, int, float, str, bytes) and the four collections
//! (list, tuple, set, dict). Dict keys and set elements are themselves
//! values, so a mapping may be keyed by integers as well as strings.
//!
//! ## Ordering and Equality
//!
//! `Value` is totally ordered so it can live in `BTreeMap`/`BTreeSet`.
//! Values of different kinds are ordered by kind rank and are never equal:
//! `Int(1) != Float(1.0)` and `Bool(true) != Int(1)`. Floats compare with
//! [`f64::total_cmp`], which makes `NaN` equal to itself and distinguishes
//! `-0.0` from `0.0`. Literal schemas do not use this equality for floats;
//! see `rubric_schema::validate`.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::kind::Kind;

/// A dynamically typed value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Set(BTreeSet<Value>),
    Dict(BTreeMap<Value, Value>),
}

impl Value {
    /// The runtime kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Null => Kind::Null,
            Self::Bool(_) => Kind::Bool,
            Self::Int(_) => Kind::Int,
            Self::Float(_) => Kind::Float,
            Self::Str(_) => Kind::Str,
            Self::Bytes(_) => Kind::Bytes,
            Self::List(_) => Kind::List,
            Self::Tuple(_) => Kind::Tuple,
            Self::Set(_) => Kind::Set,
            Self::Dict(_) => Kind::Dict,
        }
    }

    /// Build a bytes value.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Build a list from anything convertible to values.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a tuple from anything convertible to values.
    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Build a set. Duplicate elements collapse.
    pub fn set<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Set(items.into_iter().map(Into::into).collect())
    }

    /// Build a dict from key/value pairs. A repeated key keeps the last value.
    pub fn dict<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Self::Dict(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for list, tuple, set and dict values.
    pub fn is_collection(&self) -> bool {
        self.kind().is_collection()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<Value, Value>> {
        match self {
            Self::Dict(map) => Some(map),
            _ => None,
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            (Self::Bytes(a), Self::Bytes(b)) => a.cmp(b),
            (Self::List(a), Self::List(b)) | (Self::Tuple(a), Self::Tuple(b)) => a.cmp(b),
            (Self::Set(a), Self::Set(b)) => a.cmp(b),
            (Self::Dict(a), Self::Dict(b)) => a.cmp(b),
            _ => self.kind().cmp(&other.kind()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            // Keep a trailing `.0` so 1.0 is not mistaken for the int 1.
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Bytes(bytes) => {
                f.write_str("b\"")?;
                for &byte in bytes {
                    write!(f, "{}", std::ascii::escape_default(byte))?;
                }
                f.write_str("\"")
            }
            Self::List(items) => write_joined(f, "[", items.iter(), "]"),
            Self::Tuple(items) if items.len() == 1 => write!(f, "({},)", items[0]),
            Self::Tuple(items) => write_joined(f, "(", items.iter(), ")"),
            Self::Set(items) if items.is_empty() => f.write_str("set()"),
            Self::Set(items) => write_joined(f, "{", items.iter(), "}"),
            Self::Dict(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_joined<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: impl Iterator<Item = &'a Value>,
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

// ─── Conversions from Rust primitives ───────────────────────────────

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeSet<Value>> for Value {
    fn from(items: BTreeSet<Value>) -> Self {
        Self::Set(items)
    }
}

impl From<BTreeMap<Value, Value>> for Value {
    fn from(map: BTreeMap<Value, Value>) -> Self {
        Self::Dict(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_reported_per_variant() {
        assert_eq!(Value::Null.kind(), Kind::Null);
        assert_eq!(Value::from(true).kind(), Kind::Bool);
        assert_eq!(Value::from(1).kind(), Kind::Int);
        assert_eq!(Value::from(1.0).kind(), Kind::Float);
        assert_eq!(Value::from("a").kind(), Kind::Str);
        assert_eq!(Value::bytes(b"a".to_vec()).kind(), Kind::Bytes);
        assert_eq!(Value::list([1, 2]).kind(), Kind::List);
        assert_eq!(Value::tuple([1, 2]).kind(), Kind::Tuple);
        assert_eq!(Value::set([1, 2]).kind(), Kind::Set);
        assert_eq!(Value::dict([(1, "a")]).kind(), Kind::Dict);
    }

    #[test]
    fn no_cross_kind_equality() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::Bool(true), Value::Int(1));
        assert_ne!(Value::list([1]), Value::tuple([1]));
        assert_ne!(Value::Null, Value::from(""));
    }

    #[test]
    fn nan_equals_itself() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    }

    #[test]
    fn dict_keys_can_be_ints_and_strings() {
        let v = Value::dict([(Value::from(1), Value::from("one")), (Value::from("a"), Value::from(2))]);
        let map = v.as_dict().unwrap();
        assert_eq!(map.get(&Value::from(1)), Some(&Value::from("one")));
        assert_eq!(map.get(&Value::from("a")), Some(&Value::from(2)));
        assert_eq!(map.get(&Value::from(1.0)), None);
    }

    #[test]
    fn set_collapses_duplicates() {
        let v = Value::set([1, 1, 2]);
        match v {
            Value::Set(items) => assert_eq!(items.len(), 2),
            other => panic!("expected set, got {other}"),
        }
    }

    #[test]
    fn option_none_is_null() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }

    #[test]
    fn display_renders_readable_literals() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(1).to_string(), "1");
        assert_eq!(Value::from(1.0).to_string(), "1.0");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from("1").to_string(), "\"1\"");
        assert_eq!(Value::bytes(b"1\n".to_vec()).to_string(), "b\"1\\n\"");
        assert_eq!(Value::list([1, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::tuple([1]).to_string(), "(1,)");
        assert_eq!(Value::tuple([1, 2]).to_string(), "(1, 2)");
        assert_eq!(Value::set(Vec::<Value>::new()).to_string(), "set()");
        assert_eq!(Value::set([2, 1]).to_string(), "{1, 2}");
        assert_eq!(Value::dict([("a", 1)]).to_string(), "{\"a\": 1}");
    }

    #[test]
    fn sequence_accessors_match_their_own_kind() {
        assert_eq!(Value::list([1]).as_list(), Some(&[Value::Int(1)][..]));
        assert_eq!(Value::tuple([1]).as_list(), None);
        assert_eq!(Value::tuple([1]).as_tuple(), Some(&[Value::Int(1)][..]));
        assert_eq!(Value::list([1]).as_tuple(), None);
        assert_eq!(Value::from(1).as_list(), None);
    }
}
