//! # rubric CLI entry point
//!
//! Parses command-line arguments, initialises tracing and dispatches to
//! subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use rubric_cli::check::{run_check, CheckArgs};
use rubric_cli::list::{run_list, ListArgs};
use rubric_cli::validate::{run_validate, ValidateArgs};

/// rubric: recursive schema validation for JSON and YAML documents.
#[derive(Parser, Debug)]
#[command(name = "rubric", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log line format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a document against a schema.
    Validate(ValidateArgs),

    /// Load and lint schema documents.
    Check(CheckArgs),

    /// List the schemas in a directory.
    List(ListArgs),
}

fn env_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    })
}

fn init_tracing(verbose: u8, format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.with_target(false).init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "rubric starting");

    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args),
        Commands::Check(args) => run_check(args),
        Commands::List(args) => run_list(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
