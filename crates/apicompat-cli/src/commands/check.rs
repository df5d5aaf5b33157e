//! Check command
//!
//! Usage: apicompat check <BEFORE> <AFTER>
//!
//! Prints only breaking and removed declarations followed by a tally line.

use crate::commands::diff::render_colored;
use crate::commands::{InputArgs, Outcome};
use apicompat_core::diff::{render_counts, Mark, RenderOptions};
use apicompat_core::errors::Result;
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Execute check command
pub fn execute(args: CheckArgs) -> Result<Outcome> {
    let run = args.input.run()?;
    colored::control::set_override(args.input.use_color(&run.config));

    let breaking = render_colored(&run.changes, &RenderOptions::default(), |line| {
        matches!(line.mark, Mark::Breaking | Mark::Removed)
    });
    print!("{}", breaking);

    let outcome = run.outcome();
    let verdict = match outcome {
        Outcome::Clean => "ok".green(),
        Outcome::Breaking => "breaking".red().bold(),
    };
    println!("{}: {}", verdict, render_counts(&run.changes.counts()));
    Ok(outcome)
}
