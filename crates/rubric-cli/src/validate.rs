//! # Validate Subcommand
//!
//! Validates one document against either a single schema file or a named
//! schema from a schema directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use rubric_core::{ErrorKind, Kind, ValidateError};
use rubric_schema::{load_document_file, load_schema_file, validate, Schema, SchemaRegistry};

use crate::{EXIT_OK, EXIT_REJECTED};

/// Arguments for `rubric validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document to validate (.json, .yaml or .yml).
    pub document: PathBuf,

    /// Schema document to validate against.
    #[arg(long, conflicts_with = "schema_dir", required_unless_present = "schema_dir")]
    pub schema: Option<PathBuf>,

    /// Directory of `*.schema.{json,yaml,yml}` files.
    #[arg(long, requires = "name")]
    pub schema_dir: Option<PathBuf>,

    /// Schema file name inside `--schema-dir`.
    #[arg(long, requires = "schema_dir")]
    pub name: Option<String>,

    /// How to print the result.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// Result output format.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Machine-readable validation result.
#[derive(Serialize, Debug, PartialEq)]
pub struct Report {
    pub document: String,
    pub schema: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Kind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found: Option<Kind>,
}

impl Report {
    fn new(document: String, schema: String, outcome: Result<(), &ValidateError>) -> Self {
        let mut report = Self {
            document,
            schema,
            valid: outcome.is_ok(),
            path: None,
            error: None,
            expected: None,
            found: None,
        };
        if let Err(err) = outcome {
            report.path = Some(err.path_string()).filter(|p| !p.is_empty());
            report.error = Some(err.to_string());
            if let ErrorKind::TypeMismatch { expected, found } = err.kind() {
                report.expected = Some(*expected);
                report.found = Some(*found);
            }
        }
        report
    }
}

/// Execute `rubric validate`.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let (schema, schema_label) = resolve_schema(args)?;

    let document = load_document_file(&args.document)
        .with_context(|| format!("failed to load document {}", args.document.display()))?;

    tracing::info!(
        document = %args.document.display(),
        schema = %schema_label,
        "validating document"
    );

    let outcome = validate(&schema, &document).map(|_| ());
    let report = Report::new(
        args.document.display().to_string(),
        schema_label,
        outcome.as_ref().map(|_| ()),
    );

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => match &outcome {
            Ok(()) => println!("OK {}", report.document),
            Err(err) => println!("FAIL {}: {err}", report.document),
        },
    }

    Ok(if report.valid { EXIT_OK } else { EXIT_REJECTED })
}

fn resolve_schema(args: &ValidateArgs) -> Result<(Schema, String)> {
    match (&args.schema, &args.schema_dir, &args.name) {
        (Some(path), _, _) => {
            let schema = load_schema_file(path)
                .with_context(|| format!("failed to load schema {}", path.display()))?;
            Ok((schema, path.display().to_string()))
        }
        (None, Some(dir), Some(name)) => {
            let registry = SchemaRegistry::new(dir)
                .with_context(|| format!("failed to load schemas from {}", dir.display()))?;
            let schema = registry.get_schema(name).cloned().with_context(|| {
                format!(
                    "schema '{name}' not found in {} (available: {})",
                    dir.display(),
                    registry.schema_names().join(", ")
                )
            })?;
            Ok((schema, name.clone()))
        }
        _ => anyhow::bail!("either --schema or --schema-dir with --name is required"),
    }
}
