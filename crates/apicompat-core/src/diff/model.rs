//! Diff output types.
//!
//! All collections are `BTreeMap`s keyed by declaration name, so iteration
//! and serialization follow lexicographic order.

use crate::model::Declaration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Classification of one declaration between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Unchanged,
    Added,
    Removed,
    Compatible,
    Breaking,
}

impl ChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Unchanged => "unchanged",
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::Compatible => "compatible",
            ChangeKind::Breaking => "breaking",
        }
    }

    /// Whether existing callers can stop compiling. Removals count.
    pub fn is_breaking(self) -> bool {
        matches!(self, ChangeKind::Breaking | ChangeKind::Removed)
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One matched name: the declaration on each side and its classification.
///
/// A `Change` is computed once from its pair and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    before: Option<Declaration>,
    after: Option<Declaration>,
    kind: ChangeKind,
}

impl Change {
    pub(crate) fn new(before: Option<Declaration>, after: Option<Declaration>, kind: ChangeKind) -> Self {
        Self {
            before,
            after,
            kind,
        }
    }

    pub fn before(&self) -> Option<&Declaration> {
        self.before.as_ref()
    }

    pub fn after(&self) -> Option<&Declaration> {
        self.after.as_ref()
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }
}

/// Tally of changes per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub unchanged: usize,
    pub added: usize,
    pub removed: usize,
    pub compatible: usize,
    pub breaking: usize,
}

impl ChangeCounts {
    pub fn record(&mut self, kind: ChangeKind) {
        match kind {
            ChangeKind::Unchanged => self.unchanged += 1,
            ChangeKind::Added => self.added += 1,
            ChangeKind::Removed => self.removed += 1,
            ChangeKind::Compatible => self.compatible += 1,
            ChangeKind::Breaking => self.breaking += 1,
        }
    }

    pub fn merge(&mut self, other: &ChangeCounts) {
        self.unchanged += other.unchanged;
        self.added += other.added;
        self.removed += other.removed;
        self.compatible += other.compatible;
        self.breaking += other.breaking;
    }

    pub fn total(&self) -> usize {
        self.unchanged + self.added + self.removed + self.compatible + self.breaking
    }

    /// Changes that fail the CI gate: `Breaking` plus `Removed`.
    pub fn failing(&self) -> usize {
        self.breaking + self.removed
    }
}

/// Every declaration of one package, classified.
///
/// `functions` also holds type members under `Type.Member` keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageChanges {
    pub path: String,
    pub functions: BTreeMap<String, Change>,
    pub types: BTreeMap<String, Change>,
    pub values: BTreeMap<String, Change>,
}

impl PackageChanges {
    /// All changes in presentation order: functions, types, then values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Change)> {
        self.functions
            .iter()
            .chain(&self.types)
            .chain(&self.values)
            .map(|(name, change)| (name.as_str(), change))
    }

    pub fn has_breaking(&self) -> bool {
        self.iter().any(|(_, c)| c.kind().is_breaking())
    }

    pub fn counts(&self) -> ChangeCounts {
        let mut counts = ChangeCounts::default();
        for (_, change) in self.iter() {
            counts.record(change.kind());
        }
        counts
    }
}

/// Digests of the two bundles being diffed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffIdentity {
    pub before_digest: String,
    pub after_digest: String,
}

impl DiffIdentity {
    /// Equal digests mean no declaration changed.
    pub fn is_identical(&self) -> bool {
        self.before_digest == self.after_digest
    }
}

/// Diff of two multi-package bundles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleChanges {
    pub identity: DiffIdentity,
    pub packages: BTreeMap<String, PackageChanges>,
}

impl BundleChanges {
    pub fn package(&self, path: &str) -> Option<&PackageChanges> {
        self.packages.get(path)
    }

    pub fn has_breaking(&self) -> bool {
        self.packages.values().any(PackageChanges::has_breaking)
    }

    pub fn counts(&self) -> ChangeCounts {
        let mut counts = ChangeCounts::default();
        for package in self.packages.values() {
            counts.merge(&package.counts());
        }
        counts
    }
}
