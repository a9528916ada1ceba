//! # vfield CLI entry point
//!
//! Parses command-line arguments, builds the demonstration field registry
//! and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vfield_cli::fields::{run_fields, FieldsArgs};
use vfield_cli::run::{run_field, RunArgs};
use vfield_cli::schema::{run_schema, SchemaArgs};

/// Exit code for operational failures (bad input, unknown field, resolver error).
const EXIT_FAILURE: u8 = 2;

/// vfield: schema-driven argument validation for typed fields.
#[derive(Parser, Debug)]
#[command(name = "vfield", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate an argument object and run the field if it passes.
    Run(RunArgs),

    /// Print the assembled result types as GraphQL SDL.
    Schema(SchemaArgs),

    /// List registered fields.
    Fields(FieldsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so stdout stays pipeable JSON.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let registry = match vfield_core::demo::registry() {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!("schema construction failed: {e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    tracing::debug!(fields = registry.len(), "field registry built");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Commands::Run(args) => run_field(&args, &registry, std::io::stdin().lock(), &mut out),
        Commands::Schema(args) => run_schema(&args, &registry, &mut out),
        Commands::Fields(args) => run_fields(&args, &registry, &mut out),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
