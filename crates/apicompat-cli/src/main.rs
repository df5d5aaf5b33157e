//! apicompat CLI
//!
//! Compares two API snapshot documents and reports which exported
//! declarations changed and whether the change breaks callers.
//!
//! Exit codes: 0 no breaking change, 1 breaking or removed declarations,
//! 2 invalid input or configuration.

use apicompat_core::logging_facility::{init, Profile};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "apicompat")]
#[command(about = "apicompat - API compatibility checker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Human-readable debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON logs on stderr
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show every changed declaration between two snapshots
    Diff(commands::diff::DiffArgs),
    /// Report only breaking changes; for CI
    Check(commands::check::CheckArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Some(profile) = Profile::from_flags(cli.verbose, cli.log_json) {
        init(profile);
    }

    let result = match cli.command {
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Check(args) => commands::check::execute(args),
    };

    match result {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(commands::EXIT_INVALID_INPUT);
        }
    }
}
