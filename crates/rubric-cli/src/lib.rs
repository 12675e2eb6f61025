//! # rubric-cli: CLI Tool for rubric
//!
//! Provides the `rubric` command-line interface over `rubric-schema`.
//!
//! ## Subcommands
//!
//! - `rubric validate`: validate a JSON/YAML document against a schema
//!   file or a named schema in a directory.
//! - `rubric check`: load and lint schema files.
//! - `rubric list`: list the schemas in a directory.
//!
//! ```bash
//! rubric validate deploy/api.yaml --schema schemas/service.schema.yaml
//! rubric validate users/ada.json --schema-dir schemas --name user.schema.json
//! rubric check schemas/*.schema.*
//! rubric -vv list --schema-dir schemas
//! ```
//!
//! ## Exit Codes
//!
//! Handlers return `anyhow::Result<u8>`: `Ok(0)` on success, `Ok(2)` when a
//! document or schema was rejected. Errors exit with 1.

pub mod check;
pub mod list;
pub mod validate;

/// Exit code for a successful run.
pub const EXIT_OK: u8 = 0;

/// Exit code when a document or schema was rejected.
pub const EXIT_REJECTED: u8 = 2;
