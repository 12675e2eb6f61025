//! # Validation Error
//!
//! Every validation failure is reported as a single [`ValidateError`]. The
//! failure category is carried in [`ErrorKind`]; the optional payload is the
//! caller-facing message or value (for predicate failures, whatever the
//! schema author configured).
//!
//! ## Equality
//!
//! Two errors are equal when their payloads are equal. Kind and path are
//! diagnostics only, so a test can assert
//! `err == ValidateError::with_payload("ERROR")` without caring where in
//! the document the failure happened.
//!
//! ## Paths
//!
//! Errors raised deep inside a document are re-wrapped on the way out with
//! [`ValidateError::at`], which prepends the key or index being visited. The
//! resulting path renders as a JSON-Pointer-like string (`/c/d/d1`).

use std::fmt;

use thiserror::Error;

use crate::kind::Kind;
use crate::value::Value;

/// Payload used when a declared mapping key is missing and has no default.
pub const MISSING_DEFAULT_MESSAGE: &str = "no default value provided";

/// One step into a nested value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A mapping key.
    Key(Value),
    /// A sequence position.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(Value::Str(s)) => f.write_str(s),
            Self::Key(other) => write!(f, "{other}"),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// The category of a validation failure.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The value's kind differs from the kind the schema requires.
    TypeMismatch {
        /// Kind required by the schema.
        expected: Kind,
        /// Kind of the candidate value.
        found: Kind,
    },
    /// A predicate returned false.
    PredicateFailed,
    /// A predicate could not be evaluated.
    PredicateError(String),
    /// An exact-match literal schema did not equal the value.
    LiteralMismatch,
    /// An empty sequence pattern was given a non-empty sequence.
    ExpectedEmpty,
    /// A closed mapping received keys it does not declare.
    UndeclaredKeys(Vec<Value>),
    /// A declared key is missing and its schema carries no default.
    MissingDefault {
        /// The missing key.
        key: Value,
    },
    /// A sequence pattern list holds more than one element.
    MalformedPattern {
        /// Number of elements in the offending pattern list.
        len: usize,
    },
    /// Raised by a user-defined validator.
    Custom,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::PredicateFailed => f.write_str("predicate rejected value"),
            Self::PredicateError(reason) => write!(f, "predicate failed to evaluate: {reason}"),
            Self::LiteralMismatch => f.write_str("value does not equal literal"),
            Self::ExpectedEmpty => f.write_str("expected an empty sequence"),
            Self::UndeclaredKeys(keys) => {
                f.write_str("undeclared keys: ")?;
                for (i, k) in keys.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}")?;
                }
                Ok(())
            }
            Self::MissingDefault { key } => write!(f, "missing key {key} has no default"),
            Self::MalformedPattern { len } => write!(
                f,
                "sequence pattern must hold exactly one element, found {len}"
            ),
            Self::Custom => f.write_str("validation failed"),
        }
    }
}

/// A validation failure.
#[derive(Error, Debug, Clone)]
#[error("{}", render(.path, .kind, .payload))]
pub struct ValidateError {
    kind: ErrorKind,
    payload: Option<Value>,
    path: Vec<PathSegment>,
}

fn render(path: &[PathSegment], kind: &ErrorKind, payload: &Option<Value>) -> String {
    let message = match payload {
        Some(Value::Str(s)) if !s.is_empty() => s.clone(),
        Some(Value::Str(_)) | None => kind.to_string(),
        Some(other) => other.to_string(),
    };
    if path.is_empty() {
        message
    } else {
        format!("{}: {message}", render_path(path))
    }
}

fn render_path(path: &[PathSegment]) -> String {
    path.iter().map(|seg| format!("/{seg}")).collect()
}

impl ValidateError {
    /// An error with no payload, as raised by user validators.
    pub fn new() -> Self {
        Self::of_kind(ErrorKind::Custom, None)
    }

    /// An error carrying `payload`, as raised by user validators.
    pub fn with_payload(payload: impl Into<Value>) -> Self {
        Self::of_kind(ErrorKind::Custom, Some(payload.into()))
    }

    /// An error of an explicit kind.
    pub fn of_kind(kind: ErrorKind, payload: Option<Value>) -> Self {
        Self {
            kind,
            payload,
            path: Vec::new(),
        }
    }

    /// `value` is not of the `expected` kind.
    pub fn type_mismatch(value: &Value, expected: Kind) -> Self {
        Self::of_kind(
            ErrorKind::TypeMismatch {
                expected,
                found: value.kind(),
            },
            Some(Value::Str(format!("{value} is not instance of {expected}"))),
        )
    }

    /// A predicate returned false; `payload` is the schema's configured error.
    pub fn predicate_failed(payload: Option<Value>) -> Self {
        Self::of_kind(ErrorKind::PredicateFailed, payload)
    }

    /// A predicate raised instead of answering.
    pub fn predicate_error(reason: impl Into<String>) -> Self {
        Self::of_kind(ErrorKind::PredicateError(reason.into()), None)
    }

    pub fn literal_mismatch() -> Self {
        Self::of_kind(ErrorKind::LiteralMismatch, None)
    }

    pub fn expected_empty() -> Self {
        Self::of_kind(ErrorKind::ExpectedEmpty, None)
    }

    /// A closed mapping saw `keys` it does not declare. The payload stays
    /// empty; the keys are kept in the kind.
    pub fn undeclared_keys(keys: Vec<Value>) -> Self {
        Self::of_kind(ErrorKind::UndeclaredKeys(keys), None)
    }

    pub fn missing_default(key: Value) -> Self {
        Self::of_kind(
            ErrorKind::MissingDefault { key },
            Some(Value::from(MISSING_DEFAULT_MESSAGE)),
        )
    }

    pub fn malformed_pattern(len: usize) -> Self {
        let kind = ErrorKind::MalformedPattern { len };
        let message = kind.to_string();
        Self::of_kind(kind, Some(Value::Str(message)))
    }

    /// Prepend a path segment. Called while unwinding out of recursion, so
    /// the outermost segment ends up first.
    pub fn at(mut self, segment: PathSegment) -> Self {
        self.path.insert(0, segment);
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// The failure location, `""` at the root, otherwise `/a/0/b`.
    pub fn path_string(&self) -> String {
        render_path(&self.path)
    }
}

impl Default for ValidateError {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ValidateError {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}
