//! # List Subcommand
//!
//! Prints the schemas a directory provides, as `rubric validate
//! --schema-dir` would see them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use rubric_schema::SchemaRegistry;

use crate::EXIT_OK;

/// Arguments for `rubric list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Directory of `*.schema.{json,yaml,yml}` files.
    #[arg(long)]
    pub schema_dir: PathBuf,
}

/// Execute `rubric list`.
pub fn run_list(args: &ListArgs) -> Result<u8> {
    let registry = SchemaRegistry::new(&args.schema_dir)
        .with_context(|| format!("failed to load schemas from {}", args.schema_dir.display()))?;

    println!("Schemas in {}:", registry.schema_dir().display());
    println!();
    for name in registry.schema_names() {
        let form = registry
            .get_schema(name)
            .map(|s| s.form().to_string())
            .unwrap_or_default();
        println!("  {name:<32} {form}");
    }
    println!();
    println!("Total: {} schemas", registry.schema_count());
    Ok(EXIT_OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_schema_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.schema.json"), r#"{"$type": "int"}"#).unwrap();
        std::fs::write(dir.path().join("readme.md"), "# schemas").unwrap();
        let args = ListArgs {
            schema_dir: dir.path().to_path_buf(),
        };
        assert_eq!(run_list(&args).unwrap(), EXIT_OK);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = ListArgs {
            schema_dir: dir.path().join("absent"),
        };
        let err = run_list(&args).unwrap_err();
        assert!(format!("{err:#}").contains("cannot read schema directory"));
    }
}
