//! # Schema Registry
//!
//! Loads every schema document in a directory once and validates
//! documents against them by file name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rubric_core::Value;

use crate::document::{load_document_file, load_schema_file, SchemaDocumentError};
use crate::schema::Schema;
use crate::validate::validate;

const SCHEMA_SUFFIXES: [&str; 3] = [".schema.json", ".schema.yaml", ".schema.yml"];

/// A directory of schema documents, indexed by file name.
///
/// ## Thread Safety
///
/// `SchemaRegistry` is `Send + Sync`. Schemas are converted and linted once
/// at construction and only read afterwards.
#[derive(Debug)]
pub struct SchemaRegistry {
    /// Directory the schemas were loaded from.
    schema_dir: PathBuf,
    /// Map from file name (e.g. "user.schema.yaml") to converted schema.
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    /// Load every `*.schema.json`, `*.schema.yaml` and `*.schema.yml` file
    /// in `schema_dir`. Subdirectories are not searched.
    ///
    /// # Errors
    ///
    /// Fails on the first file that cannot be read, parsed or converted.
    pub fn new(schema_dir: impl AsRef<Path>) -> Result<Self, SchemaDocumentError> {
        let schema_dir = schema_dir.as_ref().to_path_buf();
        let mut schemas = HashMap::new();

        let entries =
            std::fs::read_dir(&schema_dir).map_err(|e| SchemaDocumentError::SchemaLoad {
                schema_name: schema_dir.display().to_string(),
                reason: format!("cannot read schema directory: {e}"),
            })?;

        for entry in entries {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !path.is_file() || !SCHEMA_SUFFIXES.iter().any(|s| name.ends_with(s)) {
                continue;
            }
            let schema = load_schema_file(&path)?;
            tracing::debug!(schema = name, form = %schema.form(), "loaded schema");
            schemas.insert(name.to_string(), schema);
        }

        tracing::debug!(
            dir = %schema_dir.display(),
            count = schemas.len(),
            "schema registry ready"
        );
        Ok(Self {
            schema_dir,
            schemas,
        })
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Names of all loaded schemas, sorted.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn get_schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Validate a parsed document against the named schema.
    ///
    /// # Errors
    ///
    /// `SchemaLoad` if no schema has that name, `ValidationFailed` if the
    /// document does not conform.
    pub fn validate_document(
        &self,
        document: &Value,
        schema_name: &str,
    ) -> Result<(), SchemaDocumentError> {
        let schema = self
            .get_schema(schema_name)
            .ok_or_else(|| SchemaDocumentError::SchemaLoad {
                schema_name: schema_name.to_string(),
                reason: "schema not found".to_string(),
            })?;

        validate(schema, document).map_err(|source| SchemaDocumentError::ValidationFailed {
            schema_name: schema_name.to_string(),
            source,
        })?;
        Ok(())
    }

    /// Load a JSON or YAML document and validate it against the named
    /// schema. The format follows the file extension.
    ///
    /// # Errors
    ///
    /// As [`validate_document`](Self::validate_document), plus
    /// `DocumentLoad` if the file cannot be read or parsed.
    pub fn validate_file(
        &self,
        document_path: &Path,
        schema_name: &str,
    ) -> Result<(), SchemaDocumentError> {
        let document = load_document_file(document_path)?;
        self.validate_document(&document, schema_name)
    }
}
