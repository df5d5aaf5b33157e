//! Snapshot differ and its output.
//!
//! ## Entry point
//!
//! ```ignore
//! use apicompat_core::diff::{diff_snapshots, render_changes, RenderOptions};
//!
//! let changes = diff_snapshots(&before, &after, &policy);
//! print!("{}", render_changes(&changes, &RenderOptions::default()));
//! ```
//!
//! ## Guarantees
//!
//! - **Totality**: every name present in either snapshot appears exactly once
//!   in its category.
//! - **Determinism**: output order is lexicographic by name, independent of
//!   insertion order.
//! - **Directionality**: `diff(a, b)` answers whether `b` may replace `a`.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{diff_bundles, diff_snapshots};
pub use human_summary::{render_bundle, render_changes, render_counts, render_lines, Mark, RenderOptions, SummaryLine};
pub use model::{BundleChanges, Change, ChangeCounts, ChangeKind, DiffIdentity, PackageChanges};
