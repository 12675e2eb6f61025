//! # Dispatcher
//!
//! [`validate`] is the single entry point. It classifies the schema and
//! routes to the matching check, first match wins:
//!
//! 1. bare type reference: the value's kind must equal it;
//! 2. schema node or custom validator: delegate to [`Validate::validate`];
//! 3. raw collection template: validate as a node of the matching kind
//!    with the default pattern/policy and no predicate;
//! 4. anything else: exact-match literal.
//!
//! Every nested check in a schema tree funnels back through this function.
//! Validation is fail-fast and never modifies the value; on success the
//! same reference is handed back.
//!
//! Recursion depth equals the nesting depth of the schema. There is no
//! depth limit.

use rubric_core::{Kind, ValidateError, Value};

use crate::node::{check_kind, validate_fields, validate_items, KeyPolicy, Pattern};
use crate::schema::{Schema, Validate};

/// Validate `value` against `schema`.
///
/// # Errors
///
/// Returns the first [`ValidateError`] found. Its path locates the failure
/// inside `value`.
pub fn validate<'v>(schema: &Schema, value: &'v Value) -> Result<&'v Value, ValidateError> {
    dispatch(schema, value).map_err(|e| {
        tracing::debug!(path = %e.path_string(), error = %e, "validation failed");
        e
    })?;
    Ok(value)
}

/// Recursive step, shared with the structural checks in [`crate::node`].
pub(crate) fn dispatch(schema: &Schema, value: &Value) -> Result<(), ValidateError> {
    tracing::trace!(form = %schema.form(), kind = %value.kind(), "dispatching schema");
    match schema {
        Schema::Type(kind) => check_kind(*kind, value),
        Schema::Node(node) => node.validate(value),
        Schema::Custom(custom) => custom.validate(value),
        Schema::Dict(fields) => {
            check_kind(Kind::Dict, value)?;
            validate_fields(&KeyPolicy::Closed, fields, value)
        }
        Schema::List(items) => {
            check_kind(Kind::List, value)?;
            validate_items(&Pattern::Each, items, value)
        }
        Schema::Tuple(_) => check_kind(Kind::Tuple, value),
        Schema::Set(_) => check_kind(Kind::Set, value),
        Schema::Literal(literal) if literal.is_collection() => dispatch(&Schema::lift(literal), value),
        Schema::Literal(literal) if literal_matches(literal, value) => Ok(()),
        Schema::Literal(_) => Err(ValidateError::literal_mismatch()),
    }
}

/// Scalar literal equality. Floats compare as IEEE numbers here, unlike
/// [`Value`]'s total order: `0.0` matches `-0.0` and `NaN` matches nothing.
fn literal_matches(literal: &Value, value: &Value) -> bool {
    match (literal, value) {
        (Value::Float(a), Value::Float(b)) => a == b,
        _ => literal == value,
    }
}
