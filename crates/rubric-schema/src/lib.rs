//! # rubric-schema: Recursive Schema Validation
//!
//! Validates a [`Value`](rubric_core::Value) against a schema description
//! and reports the first violation as a
//! [`ValidateError`](rubric_core::ValidateError).
//!
//! ## Validation (`validate`)
//!
//! [`validate`] is the single entry point. It classifies the [`Schema`]
//! (bare type, [`SchemaNode`], custom [`Validate`] implementation, raw
//! collection template, or literal) and recurses through nested schemas.
//! Success hands back the same value reference; values and schemas are never
//! modified.
//!
//! ## Schema Documents (`document`, `registry`)
//!
//! Schemas can also be written as JSON or YAML documents and converted with
//! [`schema_from_document`]. [`SchemaRegistry`] loads a directory of
//! `*.schema.{json,yaml,yml}` files once and validates documents against
//! them by file name.
//!
//! ## Crate Policy
//!
//! - Depends only on `rubric-core` internally.
//! - Validation is fail-fast: no error aggregation.
//! - Malformed sequence patterns are rejected when a document is loaded and
//!   again when they are reached during validation.

pub mod document;
pub mod node;
pub mod registry;
pub mod schema;
pub mod validate;

pub use document::{
    load_document_file, load_schema_file, schema_from_document, SchemaDocumentError,
    SchemaSyntaxError,
};
pub use node::{KeyPolicy, NodeKind, Pattern, Predicate, ScalarKind, SchemaNode};
pub use registry::SchemaRegistry;
pub use schema::{Schema, SchemaForm, Validate};
pub use validate::validate;
