//! # Check Subcommand
//!
//! Loads each schema file, converts it and lints it for malformed sequence
//! patterns. Every file is reported; the run fails if any file was rejected.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use rubric_schema::load_schema_file;

use crate::{EXIT_OK, EXIT_REJECTED};

/// Arguments for `rubric check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema documents to check.
    #[arg(required = true, num_args = 1..)]
    pub schemas: Vec<PathBuf>,
}

/// Execute `rubric check`.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let mut rejected = 0usize;

    for path in &args.schemas {
        match load_schema_file(path) {
            Ok(schema) => {
                tracing::debug!(schema = %path.display(), form = %schema.form(), "schema ok");
                println!("OK {}", path.display());
            }
            Err(e) => {
                rejected += 1;
                println!("FAIL {}: {e}", path.display());
            }
        }
    }

    println!();
    println!(
        "Checked {} schemas, {rejected} rejected",
        args.schemas.len()
    );

    Ok(if rejected == 0 { EXIT_OK } else { EXIT_REJECTED })
}
