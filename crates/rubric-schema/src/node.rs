//! # Schema Nodes
//!
//! A [`SchemaNode`] is a structured schema: a kind, an optional inner
//! schema, an optional predicate, an optional error payload and an optional
//! default.
//!
//! ## Validation Order
//!
//! 1. The candidate's kind must equal the node's kind exactly.
//! 2. The predicate, if any, must accept the candidate.
//! 3. Composite nodes with an inner schema then recurse through the
//!    dispatcher: sequences under [`Pattern::Each`], mappings under
//!    [`KeyPolicy::Closed`]. Named patterns and policies stop after step 2.
//!
//! Tuple and set nodes stop after step 2 even when items are given.
//!
//! ## Defaults
//!
//! `default` is `None` when no default was provided. `Some(Value::Null)` is
//! an explicit null default. Defaults only decide whether a missing mapping
//! key is acceptable; they are never written into the validated value.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rubric_core::{Kind, PathSegment, ValidateError, Value};

use crate::schema::{Schema, Validate};
use crate::validate::dispatch;

type PredicateFn = dyn Fn(&Value) -> Result<bool, String> + Send + Sync;

/// A user-supplied check run after the kind check passes.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    fn evaluate(&self, value: &Value) -> Result<bool, String> {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// How a sequence's elements are matched against its pattern list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Pattern {
    /// `"*"`: every element matches the single pattern element.
    #[default]
    Each,
    /// Reserved; validation stops after the base check.
    Named(String),
}

impl FromStr for Pattern {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        match s {
            "*" => Self::Each,
            other => Self::Named(other.to_string()),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Each => f.write_str("*"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Which candidate keys a mapping accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// `"default"`: keys must be declared; missing keys need defaults.
    #[default]
    Closed,
    /// Reserved; validation stops after the base check.
    Named(String),
}

impl FromStr for KeyPolicy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for KeyPolicy {
    fn from(s: &str) -> Self {
        match s {
            "default" => Self::Closed,
            other => Self::Named(other.to_string()),
        }
    }
}

impl fmt::Display for KeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => f.write_str("default"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Leaf kinds a node can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Int,
    Float,
    Str,
    Bytes,
    Bool,
    Null,
}

impl ScalarKind {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Int => Kind::Int,
            Self::Float => Kind::Float,
            Self::Str => Kind::Str,
            Self::Bytes => Kind::Bytes,
            Self::Bool => Kind::Bool,
            Self::Null => Kind::Null,
        }
    }
}

/// The kind of a node together with its kind-specific inner schema.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Scalar(ScalarKind),
    Sequence {
        pattern: Pattern,
        items: Option<Vec<Schema>>,
    },
    Mapping {
        policy: KeyPolicy,
        fields: Option<BTreeMap<Value, Schema>>,
    },
    /// Items are stored but not checked.
    Tuple { items: Option<Vec<Schema>> },
    /// Items are stored but not checked.
    Set { items: Option<Vec<Schema>> },
}

impl NodeKind {
    /// The value kind this node requires.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Scalar(scalar) => scalar.kind(),
            Self::Sequence { .. } => Kind::List,
            Self::Mapping { .. } => Kind::Dict,
            Self::Tuple { .. } => Kind::Tuple,
            Self::Set { .. } => Kind::Set,
        }
    }
}

/// A structured schema. Built once, then shared read-only.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    kind: NodeKind,
    predicate: Option<Predicate>,
    error: Option<Value>,
    default: Option<Value>,
}

impl SchemaNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            predicate: None,
            error: None,
            default: None,
        }
    }

    fn scalar(kind: ScalarKind) -> Self {
        Self::new(NodeKind::Scalar(kind))
    }

    pub fn int() -> Self {
        Self::scalar(ScalarKind::Int)
    }

    pub fn float() -> Self {
        Self::scalar(ScalarKind::Float)
    }

    pub fn str() -> Self {
        Self::scalar(ScalarKind::Str)
    }

    pub fn bytes() -> Self {
        Self::scalar(ScalarKind::Bytes)
    }

    pub fn bool() -> Self {
        Self::scalar(ScalarKind::Bool)
    }

    pub fn null() -> Self {
        Self::scalar(ScalarKind::Null)
    }

    /// An open list: any list is accepted.
    pub fn list() -> Self {
        Self::new(NodeKind::Sequence {
            pattern: Pattern::Each,
            items: None,
        })
    }

    /// A list whose elements must match `items` (zero or one pattern element).
    pub fn list_of(items: impl IntoIterator<Item = Schema>) -> Self {
        Self::list().items(items)
    }

    /// An open dict: any dict is accepted.
    pub fn dict() -> Self {
        Self::new(NodeKind::Mapping {
            policy: KeyPolicy::Closed,
            fields: None,
        })
    }

    /// A closed dict declaring `fields`.
    pub fn dict_of<K: Into<Value>>(fields: impl IntoIterator<Item = (K, Schema)>) -> Self {
        Self::dict().fields(fields)
    }

    pub fn tuple() -> Self {
        Self::new(NodeKind::Tuple { items: None })
    }

    pub fn tuple_of(items: impl IntoIterator<Item = Schema>) -> Self {
        Self::tuple().items(items)
    }

    pub fn set() -> Self {
        Self::new(NodeKind::Set { items: None })
    }

    pub fn set_of(items: impl IntoIterator<Item = Schema>) -> Self {
        Self::set().items(items)
    }

    /// Set the inner items of a list, tuple or set node. Has no effect on
    /// other kinds.
    pub fn items(mut self, new_items: impl IntoIterator<Item = Schema>) -> Self {
        match &mut self.kind {
            NodeKind::Sequence { items, .. }
            | NodeKind::Tuple { items }
            | NodeKind::Set { items } => *items = Some(new_items.into_iter().collect()),
            NodeKind::Scalar(_) | NodeKind::Mapping { .. } => {}
        }
        self
    }

    /// Set the declared fields of a dict node. Has no effect on other kinds.
    pub fn fields<K: Into<Value>>(mut self, new_fields: impl IntoIterator<Item = (K, Schema)>) -> Self {
        if let NodeKind::Mapping { fields, .. } = &mut self.kind {
            *fields = Some(new_fields.into_iter().map(|(k, s)| (k.into(), s)).collect());
        }
        self
    }

    /// Select the sequence pattern. Has no effect on other kinds.
    pub fn pattern(mut self, new_pattern: impl Into<Pattern>) -> Self {
        if let NodeKind::Sequence { pattern, .. } = &mut self.kind {
            *pattern = new_pattern.into();
        }
        self
    }

    /// Select the mapping key policy. Has no effect on other kinds.
    pub fn policy(mut self, new_policy: impl Into<KeyPolicy>) -> Self {
        if let NodeKind::Mapping { policy, .. } = &mut self.kind {
            *policy = new_policy.into();
        }
        self
    }

    /// Attach a predicate. A `false` result fails validation.
    pub fn validator<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Predicate(Arc::new(move |v| Ok(f(v)))));
        self
    }

    /// Attach a fallible predicate. `Err` is reported as
    /// [`ErrorKind::PredicateError`](rubric_core::ErrorKind::PredicateError).
    pub fn try_validator<F, E>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<bool, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        self.predicate = Some(Predicate(Arc::new(move |v| f(v).map_err(|e| e.to_string()))));
        self
    }

    /// Payload reported when the predicate rejects a value.
    pub fn error(mut self, payload: impl Into<Value>) -> Self {
        self.error = Some(payload.into());
        self
    }

    /// Default that makes this schema's key optional inside a dict.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn error_payload(&self) -> Option<&Value> {
        self.error.as_ref()
    }

    pub fn has_predicate(&self) -> bool {
        self.predicate.is_some()
    }

    /// Kind check followed by the predicate.
    fn validate_base(&self, value: &Value) -> Result<(), ValidateError> {
        check_kind(self.kind.kind(), value)?;
        if let Some(predicate) = &self.predicate {
            match predicate.evaluate(value) {
                Ok(true) => {}
                Ok(false) => return Err(ValidateError::predicate_failed(self.error.clone())),
                Err(reason) => return Err(ValidateError::predicate_error(reason)),
            }
        }
        Ok(())
    }

    /// Report a malformed sequence pattern anywhere under this node.
    pub fn check(&self) -> Result<(), ValidateError> {
        match &self.kind {
            NodeKind::Sequence {
                items: Some(items), ..
            } => check_items(items),
            NodeKind::Mapping {
                fields: Some(fields),
                ..
            } => check_fields(fields),
            _ => Ok(()),
        }
    }
}

impl Validate for SchemaNode {
    fn validate(&self, value: &Value) -> Result<(), ValidateError> {
        self.validate_base(value)?;
        match &self.kind {
            NodeKind::Sequence {
                pattern,
                items: Some(items),
            } => validate_items(pattern, items, value),
            NodeKind::Mapping {
                policy,
                fields: Some(fields),
            } => validate_fields(policy, fields, value),
            _ => Ok(()),
        }
    }

    fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Fail unless `value` is exactly of `kind`.
pub(crate) fn check_kind(kind: Kind, value: &Value) -> Result<(), ValidateError> {
    if value.kind() == kind {
        Ok(())
    } else {
        Err(ValidateError::type_mismatch(value, kind))
    }
}

/// Structural check of a list against its pattern list.
pub(crate) fn validate_items(
    pattern: &Pattern,
    items: &[Schema],
    value: &Value,
) -> Result<(), ValidateError> {
    if let Pattern::Named(name) = pattern {
        tracing::trace!(pattern = %name, "reserved sequence pattern, skipping element checks");
        return Ok(());
    }
    let Some(elements) = value.as_list() else {
        return Err(ValidateError::type_mismatch(value, Kind::List));
    };
    match items {
        [] if elements.is_empty() => Ok(()),
        [] => Err(ValidateError::expected_empty()),
        [element] => {
            for (i, v) in elements.iter().enumerate() {
                dispatch(element, v).map_err(|e| e.at(PathSegment::Index(i)))?;
            }
            Ok(())
        }
        _ => Err(ValidateError::malformed_pattern(items.len())),
    }
}

/// Structural check of a dict against its declared fields.
pub(crate) fn validate_fields(
    policy: &KeyPolicy,
    fields: &BTreeMap<Value, Schema>,
    value: &Value,
) -> Result<(), ValidateError> {
    if let KeyPolicy::Named(name) = policy {
        tracing::trace!(policy = %name, "reserved key policy, skipping field checks");
        return Ok(());
    }
    let Some(map) = value.as_dict() else {
        return Err(ValidateError::type_mismatch(value, Kind::Dict));
    };

    let undeclared: Vec<Value> = map
        .keys()
        .filter(|k| !fields.contains_key(*k))
        .cloned()
        .collect();
    if !undeclared.is_empty() {
        return Err(ValidateError::undeclared_keys(undeclared));
    }

    for (key, schema) in fields {
        match map.get(key) {
            Some(v) => {
                dispatch(schema, v).map_err(|e| e.at(PathSegment::Key(key.clone())))?;
            }
            None if schema.default_value().is_some() => {}
            None => {
                return Err(ValidateError::missing_default(key.clone())
                    .at(PathSegment::Key(key.clone())));
            }
        }
    }
    Ok(())
}

pub(crate) fn check_items(items: &[Schema]) -> Result<(), ValidateError> {
    match items {
        [] => Ok(()),
        [element] => element.check().map_err(|e| e.at(PathSegment::Index(0))),
        _ => Err(ValidateError::malformed_pattern(items.len())),
    }
}

pub(crate) fn check_fields(fields: &BTreeMap<Value, Schema>) -> Result<(), ValidateError> {
    for (key, schema) in fields {
        schema
            .check()
            .map_err(|e| e.at(PathSegment::Key(key.clone())))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubric_core::ErrorKind;

    fn below_ten(v: &Value) -> bool {
        v.as_int().is_some_and(|x| x < 10)
    }

    #[test]
    fn scalar_nodes_check_kind() {
        SchemaNode::int().validate(&Value::from(1)).unwrap();
        SchemaNode::float().validate(&Value::from(1.0)).unwrap();
        SchemaNode::str().validate(&Value::from("1")).unwrap();
        SchemaNode::bytes().validate(&Value::bytes(b"1".to_vec())).unwrap();
        SchemaNode::bool().validate(&Value::from(true)).unwrap();
        SchemaNode::null().validate(&Value::Null).unwrap();

        assert!(SchemaNode::int().validate(&Value::from("1")).is_err());
        assert!(SchemaNode::float().validate(&Value::from("1")).is_err());
        assert!(SchemaNode::str().validate(&Value::from(1)).is_err());
        assert!(SchemaNode::bytes().validate(&Value::from("1")).is_err());
        assert!(SchemaNode::bool().validate(&Value::from("1")).is_err());
        assert!(SchemaNode::null().validate(&Value::from("1")).is_err());
    }

    #[test]
    fn int_is_never_float_and_bool_is_never_int() {
        let err = SchemaNode::float().validate(&Value::from(1)).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::TypeMismatch {
                expected: Kind::Float,
                found: Kind::Int
            }
        );
        assert!(SchemaNode::int().validate(&Value::from(true)).is_err());
    }

    #[test]
    fn predicate_runs_after_kind_check() {
        let schema = SchemaNode::int().validator(below_ten);
        schema.validate(&Value::from(1)).unwrap();
        let err = schema.validate(&Value::from(10)).unwrap_err();
        assert_eq!(err, ValidateError::new());
        assert_eq!(err.kind(), &ErrorKind::PredicateFailed);

        // Kind mismatch wins; the predicate never sees a string.
        let err = schema.validate(&Value::from("1")).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn predicate_failure_carries_configured_payload() {
        let schema = SchemaNode::int().validator(below_ten).error("ERROR");
        let err = schema.validate(&Value::from(10)).unwrap_err();
        assert_eq!(err, ValidateError::with_payload("ERROR"));
    }

    #[test]
    fn fallible_predicate_error_is_propagated() {
        let schema = SchemaNode::str().try_validator(|v| match v.as_str() {
            Some("boom") => Err("predicate exploded"),
            Some(s) => Ok(!s.is_empty()),
            None => Ok(false),
        });
        schema.validate(&Value::from("ok")).unwrap();
        assert_eq!(
            schema.validate(&Value::from("")).unwrap_err().kind(),
            &ErrorKind::PredicateFailed
        );
        let err = schema.validate(&Value::from("boom")).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::PredicateError("predicate exploded".to_string())
        );
    }

    #[test]
    fn open_list_accepts_any_list() {
        let schema = SchemaNode::list();
        schema.validate(&Value::list(Vec::<Value>::new())).unwrap();
        schema.validate(&Value::list([1, 2, 3])).unwrap();
        assert!(schema.validate(&Value::from("1")).is_err());
        assert!(schema.validate(&Value::tuple([1])).is_err());
    }

    #[test]
    fn single_pattern_list_checks_every_element() {
        let schema = SchemaNode::list_of([Schema::literal(1)]);
        schema.validate(&Value::list(Vec::<Value>::new())).unwrap();
        schema.validate(&Value::list([1])).unwrap();
        schema.validate(&Value::list([1, 1])).unwrap();
        assert!(schema.validate(&Value::list([2])).is_err());

        let err = schema.validate(&Value::list([1, 2])).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::LiteralMismatch);
        assert_eq!(err.path(), &[PathSegment::Index(1)]);
    }

    #[test]
    fn empty_pattern_accepts_only_empty_list() {
        let schema = SchemaNode::list_of(Vec::<Schema>::new());
        schema.validate(&Value::list(Vec::<Value>::new())).unwrap();
        let err = schema.validate(&Value::list([1])).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ExpectedEmpty);
        assert_eq!(err, ValidateError::new());
    }

    #[test]
    fn multi_element_pattern_is_rejected_before_elements() {
        let schema = SchemaNode::list_of([Schema::Type(Kind::Int), Schema::Type(Kind::Str)]);
        let err = schema.validate(&Value::list(Vec::<Value>::new())).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MalformedPattern { len: 2 });
        assert!(schema.check().is_err());
    }

    #[test]
    fn named_pattern_skips_element_checks() {
        let schema = SchemaNode::list_of([Schema::literal(1)]).pattern("+");
        schema.validate(&Value::list([2, 3])).unwrap();
        assert!(schema.validate(&Value::from(1)).is_err());
    }

    #[test]
    fn open_dict_accepts_any_dict() {
        let schema = SchemaNode::dict();
        schema.validate(&Value::dict(Vec::<(Value, Value)>::new())).unwrap();
        schema.validate(&Value::dict([(1, 2)])).unwrap();
        assert!(schema.validate(&Value::from("1")).is_err());
    }

    #[test]
    fn dict_fields_recurse() {
        let schema = SchemaNode::dict_of([(1, Schema::Type(Kind::Str))]);
        schema.validate(&Value::dict([(1, "1")])).unwrap();
        let err = schema.validate(&Value::dict([(1, 1)])).unwrap_err();
        assert_eq!(err.path(), &[PathSegment::Key(Value::from(1))]);
    }

    #[test]
    fn undeclared_keys_are_reported() {
        let schema = SchemaNode::dict_of([("a", Schema::Type(Kind::Int))]);
        let err = schema
            .validate(&Value::dict([
                (Value::from("a"), Value::from(1)),
                (Value::from("z"), Value::from(1)),
            ]))
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UndeclaredKeys(vec![Value::from("z")]));
        assert!(err.payload().is_none());
    }

    #[test]
    fn missing_key_requires_default() {
        let without = SchemaNode::dict_of([
            ("a", Schema::Type(Kind::Int)),
            ("b", Schema::Type(Kind::Str)),
        ]);
        let err = without.validate(&Value::dict([("a", 1)])).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::MissingDefault {
                key: Value::from("b")
            }
        );
        assert_eq!(err.path_string(), "/b");

        let with = SchemaNode::dict_of([
            ("a", Schema::Type(Kind::Int)),
            ("b", SchemaNode::str().default("1").into()),
        ]);
        with.validate(&Value::dict([("a", 1)])).unwrap();
    }

    #[test]
    fn null_default_counts_as_a_default() {
        let schema = SchemaNode::dict_of([("a", SchemaNode::int().default(Value::Null).into())]);
        schema.validate(&Value::dict(Vec::<(Value, Value)>::new())).unwrap();
    }

    #[test]
    fn default_is_not_injected() {
        let schema = SchemaNode::dict_of([("b", SchemaNode::str().default("1").into())]);
        let value = Value::dict(Vec::<(Value, Value)>::new());
        schema.validate(&value).unwrap();
        assert_eq!(value, Value::dict(Vec::<(Value, Value)>::new()));
    }

    #[test]
    fn named_policy_skips_key_checks() {
        let schema = SchemaNode::dict_of([("a", Schema::Type(Kind::Int))]).policy("open");
        schema.validate(&Value::dict([("z", "anything")])).unwrap();
    }

    #[test]
    fn dict_predicate_runs_before_fields() {
        let schema = SchemaNode::dict_of([("a", Schema::Type(Kind::Int))])
            .validator(|v| v.as_dict().is_some_and(|m| !m.is_empty()))
            .error("empty");
        let err = schema
            .validate(&Value::dict(Vec::<(Value, Value)>::new()))
            .unwrap_err();
        assert_eq!(err, ValidateError::with_payload("empty"));
    }

    #[test]
    fn tuple_and_set_items_are_inert() {
        let tuple = SchemaNode::tuple_of([Schema::Type(Kind::Str)]);
        tuple.validate(&Value::tuple([1, 2])).unwrap();
        assert!(tuple.validate(&Value::list([1])).is_err());

        let set = SchemaNode::set_of([Schema::Type(Kind::Str)]);
        set.validate(&Value::set([1, 2])).unwrap();
        assert!(set.validate(&Value::tuple([1])).is_err());
    }

    #[test]
    fn pattern_and_policy_parse_from_text() {
        assert_eq!("*".parse::<Pattern>().unwrap(), Pattern::Each);
        assert_eq!(Pattern::from("?"), Pattern::Named("?".to_string()));
        assert_eq!(Pattern::Each.to_string(), "*");
        assert_eq!("default".parse::<KeyPolicy>().unwrap(), KeyPolicy::Closed);
        assert_eq!(KeyPolicy::from("loose"), KeyPolicy::Named("loose".to_string()));
        assert_eq!(KeyPolicy::Closed.to_string(), "default");
    }

    #[test]
    fn builders_ignore_options_for_other_kinds() {
        let node = SchemaNode::int().pattern("+").policy("loose").items([Schema::literal(1)]);
        assert!(matches!(node.kind(), NodeKind::Scalar(ScalarKind::Int)));
    }

    #[test]
    fn accessors_expose_configuration() {
        let node = SchemaNode::int().validator(below_ten).error("E").default(3);
        assert!(node.has_predicate());
        assert_eq!(node.error_payload(), Some(&Value::from("E")));
        assert_eq!(node.default_value(), Some(&Value::from(3)));
        assert_eq!(node.kind().kind(), Kind::Int);
    }
}
