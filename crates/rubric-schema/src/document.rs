//! # Schema Documents
//!
//! Schemas written as JSON or YAML. A document is read into a [`Value`]
//! and converted into a [`Schema`]:
//!
//! - a mapping with exactly one `$`-prefixed key is a directive:
//!   - `{"$type": "int"}`: bare type reference;
//!   - `{"$int": opts}` … `{"$set": opts}`: a [`SchemaNode`] of that kind,
//!     `opts` being `null` or a mapping of `schema`, `default`,
//!     `pattern` (`$list` only) and `policy` (`$dict` only);
//!   - `{"$literal": v}`: `v` verbatim as a literal;
//! - any other mapping is a raw dict template, a sequence is a raw list
//!   template, and a scalar is a literal.
//!
//! ```yaml
//! name: {$type: str}
//! port: {$int: {default: 8080}}
//! tags: [{$type: str}]
//! mode: release
//! ```
//!
//! The converted schema is linted with [`Schema::check`], so malformed
//! sequence patterns are rejected at load time. Predicates cannot be
//! expressed in documents, and neither can the `error` payload that only a
//! failing predicate reports.

use std::collections::BTreeMap;
use std::path::Path;

use rubric_core::{ConversionError, Kind, ValidateError, Value};
use thiserror::Error;

use crate::node::{KeyPolicy, Pattern, SchemaNode};
use crate::schema::Schema;

/// Error converting a document into a schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaSyntaxError {
    /// A `$`-prefixed key that names no directive.
    #[error("unknown directive '${0}'")]
    UnknownDirective(String),

    /// `$type` was given something other than a kind name.
    #[error("'$type' expects one of null, bool, int, float, str, bytes, list, tuple, set, dict; got {0}")]
    BadType(String),

    /// Directive options were neither a mapping nor null.
    #[error("options for '${directive}' must be a mapping or null, got {found}")]
    BadOptions {
        /// Directive name without the `$`.
        directive: String,
        /// The offending options value.
        found: String,
    },

    /// An option the directive does not understand.
    #[error("unknown option {option} for '${directive}'")]
    UnknownOption {
        /// Directive name without the `$`.
        directive: String,
        /// The offending option key.
        option: String,
    },

    /// An option value of the wrong shape.
    #[error("option '{option}' for '${directive}' must be {expected}")]
    BadOption {
        /// Directive name without the `$`.
        directive: String,
        /// Option name.
        option: String,
        /// Description of the accepted shape.
        expected: &'static str,
    },

    /// The schema converted but is malformed.
    #[error("malformed schema: {0}")]
    Malformed(#[from] ValidateError),
}

/// Error loading schemas or documents from disk, or validating them.
#[derive(Error, Debug)]
pub enum SchemaDocumentError {
    /// The document did not conform to the schema.
    #[error("validation failed against schema '{schema_name}': {source}")]
    ValidationFailed {
        /// Name of the schema that was validated against.
        schema_name: String,
        /// First violation found.
        source: ValidateError,
    },

    /// The schema file could not be read or parsed.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoad {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The schema file parsed but is not a valid schema document.
    #[error("invalid schema '{schema_name}': {source}")]
    InvalidSchema {
        /// Schema filename or identifier.
        schema_name: String,
        /// What is wrong with it.
        source: SchemaSyntaxError,
    },

    /// The document file could not be loaded or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad {
        /// Path to the document that failed to load.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// IO error reading a schema directory.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert a parsed document into a schema and lint it.
///
/// # Errors
///
/// Returns [`SchemaSyntaxError`] for an unknown directive or option, an
/// option of the wrong shape, or a malformed sequence pattern.
pub fn schema_from_document(doc: &Value) -> Result<Schema, SchemaSyntaxError> {
    let schema = convert(doc)?;
    schema.check()?;
    Ok(schema)
}

fn convert(doc: &Value) -> Result<Schema, SchemaSyntaxError> {
    match doc {
        Value::Dict(map) => {
            if let Some((name, body)) = directive(map) {
                return convert_directive(name, body);
            }
            let mut fields = BTreeMap::new();
            for (key, sub) in map {
                fields.insert(key.clone(), convert(sub)?);
            }
            Ok(Schema::Dict(fields))
        }
        Value::List(items) => Ok(Schema::List(convert_all(items)?)),
        other => Ok(Schema::Literal(other.clone())),
    }
}

fn convert_all(items: &[Value]) -> Result<Vec<Schema>, SchemaSyntaxError> {
    items.iter().map(convert).collect()
}

/// The directive name and body if `map` is a single `$`-prefixed key.
fn directive(map: &BTreeMap<Value, Value>) -> Option<(&str, &Value)> {
    if map.len() != 1 {
        return None;
    }
    let (key, body) = map.iter().next()?;
    let name = key.as_str()?.strip_prefix('$')?;
    Some((name, body))
}

fn convert_directive(name: &str, body: &Value) -> Result<Schema, SchemaSyntaxError> {
    match name {
        "type" => body
            .as_str()
            .and_then(|s| s.parse::<Kind>().ok())
            .map(Schema::Type)
            .ok_or_else(|| SchemaSyntaxError::BadType(body.to_string())),
        "literal" => Ok(Schema::Literal(body.clone())),
        other => {
            let kind: Kind = other
                .parse()
                .map_err(|_| SchemaSyntaxError::UnknownDirective(other.to_string()))?;
            node_directive(kind, body).map(Schema::Node)
        }
    }
}

fn node_directive(kind: Kind, body: &Value) -> Result<SchemaNode, SchemaSyntaxError> {
    let directive = kind.as_str();
    let empty = BTreeMap::new();
    let options = match body {
        Value::Null => &empty,
        Value::Dict(map) => map,
        other => {
            return Err(SchemaSyntaxError::BadOptions {
                directive: directive.to_string(),
                found: other.to_string(),
            })
        }
    };

    let mut node = match kind {
        Kind::Null => SchemaNode::null(),
        Kind::Bool => SchemaNode::bool(),
        Kind::Int => SchemaNode::int(),
        Kind::Float => SchemaNode::float(),
        Kind::Str => SchemaNode::str(),
        Kind::Bytes => SchemaNode::bytes(),
        Kind::List => SchemaNode::list(),
        Kind::Tuple => SchemaNode::tuple(),
        Kind::Set => SchemaNode::set(),
        Kind::Dict => SchemaNode::dict(),
    };

    let bad_option = |option: &str, expected: &'static str| SchemaSyntaxError::BadOption {
        directive: directive.to_string(),
        option: option.to_string(),
        expected,
    };

    for (key, value) in options {
        match (key.as_str(), kind) {
            (Some("default"), _) => node = node.default(value.clone()),
            (Some("schema"), Kind::List | Kind::Tuple | Kind::Set) => {
                let items = value
                    .as_list()
                    .ok_or_else(|| bad_option("schema", "a sequence of schemas"))?;
                node = node.items(convert_all(items)?);
            }
            (Some("schema"), Kind::Dict) => {
                let fields = value
                    .as_dict()
                    .ok_or_else(|| bad_option("schema", "a mapping of key to schema"))?;
                let mut converted = BTreeMap::new();
                for (k, sub) in fields {
                    converted.insert(k.clone(), convert(sub)?);
                }
                node = node.fields(converted);
            }
            (Some("pattern"), Kind::List) => {
                let pattern = value
                    .as_str()
                    .ok_or_else(|| bad_option("pattern", "a string"))?;
                node = node.pattern(Pattern::from(pattern));
            }
            (Some("policy"), Kind::Dict) => {
                let policy = value
                    .as_str()
                    .ok_or_else(|| bad_option("policy", "a string"))?;
                node = node.policy(KeyPolicy::from(policy));
            }
            _ => {
                return Err(SchemaSyntaxError::UnknownOption {
                    directive: directive.to_string(),
                    option: key.to_string(),
                })
            }
        }
    }
    Ok(node)
}

/// Read a JSON or YAML file into a [`Value`].
///
/// `.yaml` and `.yml` files are parsed as YAML, everything else as JSON.
fn read_value(path: &Path) -> Result<Value, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("cannot read file: {e}"))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(&content).map_err(|e| format!("invalid YAML: {e}"))?;
            Value::try_from(yaml)
                .map_err(|e: ConversionError| format!("YAML conversion failed: {e}"))
        }
        _ => {
            let json: serde_json::Value =
                serde_json::from_str(&content).map_err(|e| format!("invalid JSON: {e}"))?;
            Ok(Value::from(json))
        }
    }
}

/// Load a document to be validated.
///
/// # Errors
///
/// Returns `SchemaDocumentError::DocumentLoad` if the file cannot be read
/// or parsed.
pub fn load_document_file(path: &Path) -> Result<Value, SchemaDocumentError> {
    read_value(path).map_err(|reason| SchemaDocumentError::DocumentLoad {
        path: path.display().to_string(),
        reason,
    })
}

/// Load and convert a schema document.
///
/// # Errors
///
/// Returns `SchemaDocumentError::SchemaLoad` if the file cannot be read or
/// parsed, and `SchemaDocumentError::InvalidSchema` if it is not a valid
/// schema document.
pub fn load_schema_file(path: &Path) -> Result<Schema, SchemaDocumentError> {
    let schema_name = path.display().to_string();
    let doc = read_value(path).map_err(|reason| SchemaDocumentError::SchemaLoad {
        schema_name: schema_name.clone(),
        reason,
    })?;
    schema_from_document(&doc)
        .map_err(|source| SchemaDocumentError::InvalidSchema { schema_name, source })
}
