//! Diff command
//!
//! Usage: apicompat diff <BEFORE> <AFTER> [--all] [--json]

use crate::commands::{InputArgs, Outcome};
use apicompat_core::diff::{render_lines, Mark, RenderOptions, SummaryLine};
use apicompat_core::errors::{ExError, ExErrorKind, Result};
use apicompat_core::BundleChanges;
use clap::Args;
use colored::{ColoredString, Colorize};

#[derive(Debug, Args)]
pub struct DiffArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Also list unchanged declarations
    #[arg(short, long)]
    pub all: bool,

    /// Print the structured diff as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute diff command
pub fn execute(args: DiffArgs) -> Result<Outcome> {
    let run = args.input.run()?;

    if args.json {
        let text = serde_json::to_string_pretty(&run.changes).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("diff")
                .with_message(e.to_string())
        })?;
        println!("{}", text);
        return Ok(run.outcome());
    }

    colored::control::set_override(args.input.use_color(&run.config));
    let opts = RenderOptions {
        show_unchanged: args.all || run.config.output.show_unchanged,
    };
    print!("{}", render_colored(&run.changes, &opts, |_| true));
    Ok(run.outcome())
}

/// Render every package with visible lines under a `package` header.
/// `keep` filters the primary lines; continuations follow their primary.
pub(crate) fn render_colored<F>(changes: &BundleChanges, opts: &RenderOptions, keep: F) -> String
where
    F: Fn(&SummaryLine) -> bool,
{
    let mut sections = Vec::new();
    for (path, package) in &changes.packages {
        let mut body = String::new();
        let mut kept = false;
        for line in render_lines(package, opts) {
            if line.mark != Mark::Continuation {
                kept = keep(&line);
            }
            if kept {
                body.push_str(&format!("{} {}\n", paint(line.mark), line.text));
            }
        }
        if !body.is_empty() {
            sections.push(format!("package {}\n{}", path, body));
        }
    }
    sections.join("\n")
}

fn paint(mark: Mark) -> ColoredString {
    let symbol = mark.symbol();
    match mark {
        Mark::Added => symbol.green(),
        Mark::Removed | Mark::Breaking => symbol.red(),
        Mark::Unchanged => symbol.blue(),
        Mark::Compatible => symbol.yellow(),
        Mark::Continuation => symbol.normal(),
    }
}
