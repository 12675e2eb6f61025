//! # rubric-core: Foundational Types for rubric
//!
//! The leaf crate of the workspace. It defines the data model that schemas
//! are validated against and the single error type every validation failure
//! is reported as. The schema model and the dispatcher live in
//! `rubric-schema`; this crate knows nothing about schemas.
//!
//! ## Key Design Principles
//!
//! 1. **One dynamic value type.** [`Value`] is a closed enum over the scalar
//!    and collection kinds. It is totally ordered, so dicts can be keyed by
//!    any value and sets can hold any value.
//!
//! 2. **Exact kinds.** [`Kind`] matching never widens: an int is not a float
//!    and a bool is not an int.
//!
//! 3. **One error type.** [`ValidateError`] covers every failure category.
//!    Equality compares payloads only; [`ErrorKind`] and the failure path are
//!    diagnostics.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rubric-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod convert;
pub mod error;
pub mod kind;
pub mod value;

pub use convert::ConversionError;
pub use error::{ErrorKind, PathSegment, ValidateError, MISSING_DEFAULT_MESSAGE};
pub use kind::{Kind, UnknownKind, ALL_KINDS};
pub use value::Value;
