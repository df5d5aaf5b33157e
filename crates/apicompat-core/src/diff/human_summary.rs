//! Plain-text rendering of classified changes.
//!
//! One line per declaration, prefixed by a mark:
//!
//! ```text
//! + func Added(int)
//! - func Removed()
//! = type Same struct{Foo string}
//! * func Compatible1(int)
//! . func Compatible1(int, ...string)
//! ! var Breaking bool
//! . const Breaking bool
//! ```
//!
//! Compatible and breaking changes show the old form on the marked line and
//! the new form on a `.` continuation line. Colour is left to the caller.

use crate::diff::model::{BundleChanges, Change, ChangeCounts, ChangeKind, PackageChanges};

/// Line prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Added,
    Removed,
    Unchanged,
    Compatible,
    Breaking,
    /// The new form of a compatible or breaking change.
    Continuation,
}

impl Mark {
    pub fn symbol(self) -> &'static str {
        match self {
            Mark::Added => "+",
            Mark::Removed => "-",
            Mark::Unchanged => "=",
            Mark::Compatible => "*",
            Mark::Breaking => "!",
            Mark::Continuation => ".",
        }
    }
}

impl From<ChangeKind> for Mark {
    fn from(kind: ChangeKind) -> Self {
        match kind {
            ChangeKind::Added => Mark::Added,
            ChangeKind::Removed => Mark::Removed,
            ChangeKind::Unchanged => Mark::Unchanged,
            ChangeKind::Compatible => Mark::Compatible,
            ChangeKind::Breaking => Mark::Breaking,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub mark: Mark,
    pub text: String,
}

impl std::fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.mark.symbol(), self.text)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_unchanged: bool,
}

/// Lines for one package: functions, then types, then values, each sorted by
/// name.
pub fn render_lines(changes: &PackageChanges, opts: &RenderOptions) -> Vec<SummaryLine> {
    let mut lines = Vec::new();
    for (_, change) in changes.iter() {
        push_change(&mut lines, change, opts);
    }
    lines
}

fn push_change(lines: &mut Vec<SummaryLine>, change: &Change, opts: &RenderOptions) {
    let kind = change.kind();
    if kind == ChangeKind::Unchanged && !opts.show_unchanged {
        return;
    }

    let primary = match kind {
        ChangeKind::Added => change.after(),
        _ => change.before().or(change.after()),
    };
    let Some(primary) = primary else {
        return;
    };
    lines.push(SummaryLine {
        mark: kind.into(),
        text: primary.to_string(),
    });

    if matches!(kind, ChangeKind::Compatible | ChangeKind::Breaking) {
        if let Some(after) = change.after() {
            lines.push(SummaryLine {
                mark: Mark::Continuation,
                text: after.to_string(),
            });
        }
    }
}

/// Render one package as newline-terminated lines.
pub fn render_changes(changes: &PackageChanges, opts: &RenderOptions) -> String {
    let mut out = String::new();
    for line in render_lines(changes, opts) {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}

/// Render every package that has visible lines under a `package <path>`
/// header, separated by blank lines.
pub fn render_bundle(bundle: &BundleChanges, opts: &RenderOptions) -> String {
    let mut sections = Vec::new();
    for (path, package) in &bundle.packages {
        let body = render_changes(package, opts);
        if body.is_empty() {
            continue;
        }
        sections.push(format!("package {}\n{}", path, body));
    }
    sections.join("\n")
}

/// One-line tally, e.g. `1 breaking, 2 compatible, 0 added, 1 removed, 5 unchanged`.
pub fn render_counts(counts: &ChangeCounts) -> String {
    format!(
        "{} breaking, {} compatible, {} added, {} removed, {} unchanged",
        counts.breaking, counts.compatible, counts.added, counts.removed, counts.unchanged
    )
}
