//! Subcommands and the input handling they share.

pub mod check;
pub mod diff;

use apicompat_core::config::CompatConfig;
use apicompat_core::errors::Result;
use apicompat_core::snapshot::parse_snapshot_file;
use apicompat_core::{diff_bundles, BundleChanges};
use clap::Args;
use std::io::IsTerminal;
use std::path::PathBuf;

pub const EXIT_OK: i32 = 0;
pub const EXIT_BREAKING: i32 = 1;
pub const EXIT_INVALID_INPUT: i32 = 2;

/// Result of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    Breaking,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Clean => EXIT_OK,
            Outcome::Breaking => EXIT_BREAKING,
        }
    }

    fn of(changes: &BundleChanges) -> Self {
        if changes.has_breaking() {
            Outcome::Breaking
        } else {
            Outcome::Clean
        }
    }
}

/// Arguments common to every subcommand.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Snapshot of the old revision
    pub before: PathBuf,

    /// Snapshot of the new revision
    pub after: PathBuf,

    /// Config file (default: .apicompat.toml in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Treat extra results on functions that already return something as breaking
    #[arg(long)]
    pub strict_results: bool,

    /// Disable coloured marks
    #[arg(long)]
    pub no_color: bool,
}

/// Loaded inputs and their diff.
pub struct Run {
    pub config: CompatConfig,
    pub changes: BundleChanges,
}

impl InputArgs {
    /// Load config and both snapshots, then diff them.
    pub fn run(&self) -> Result<Run> {
        let mut config = match &self.config {
            Some(path) => CompatConfig::load(path)?,
            None => CompatConfig::discover(std::path::Path::new("."))?,
        };
        if self.strict_results {
            config.policy.allow_result_extension = false;
        }

        let before = parse_snapshot_file(&self.before)?;
        let after = parse_snapshot_file(&self.after)?;
        tracing::debug!(
            before_packages = before.len(),
            after_packages = after.len(),
            "snapshots loaded"
        );

        let changes = diff_bundles(&before, &after, &config.policy);
        Ok(Run { config, changes })
    }

    /// Whether marks are coloured: the flag wins, then config, then tty.
    pub fn use_color(&self, config: &CompatConfig) -> bool {
        !self.no_color
            && config
                .output
                .color
                .unwrap_or_else(|| std::io::stdout().is_terminal())
    }
}

impl Run {
    pub fn outcome(&self) -> Outcome {
        Outcome::of(&self.changes)
    }
}
