//! Snapshot differ.
//!
//! Pairs declarations by name across two snapshots and classifies each pair
//! with the matching comparator. Classification of one name never depends on
//! another, so the result is a pure function of the two inputs.

use crate::compare::{classify_function, classify_type, classify_value, TypeComparer};
use crate::config::CompatPolicy;
use crate::diff::model::{BundleChanges, Change, ChangeKind, DiffIdentity, PackageChanges};
use crate::model::{Declaration, FunctionDecl, Snapshot, SnapshotBundle, TypeDecl};
use crate::{log_decl_classified, log_op_end, log_op_start};
use std::collections::{BTreeMap, BTreeSet};

/// Classify every declaration of `before` against `after`.
///
/// Types present on both sides also have their methods and associated
/// functions matched; those land in `functions` under `Type.Member` keys.
pub fn diff_snapshots(before: &Snapshot, after: &Snapshot, policy: &CompatPolicy) -> PackageChanges {
    let path = if before.path().is_empty() {
        after.path()
    } else {
        before.path()
    };
    log_op_start!("diff_snapshots", package = path);
    let start = std::time::Instant::now();

    let comparer = TypeComparer::new(before, after, policy);
    let mut changes = PackageChanges {
        path: path.to_string(),
        ..PackageChanges::default()
    };

    for name in union_keys(before.functions(), after.functions()) {
        let b = before.function(name);
        let a = after.function(name);
        let kind = classify_function(b, a, &comparer);
        record(path, "function", &mut changes.functions, name.to_string(), b, a, kind);
    }

    for name in union_keys(before.types(), after.types()) {
        let b = before.type_decl(name);
        let a = after.type_decl(name);
        let kind = classify_type(b, a, &comparer);
        record(path, "type", &mut changes.types, name.to_string(), b, a, kind);

        if let (Some(b), Some(a)) = (b, a) {
            diff_members(path, b, a, &comparer, &mut changes.functions);
        }
    }

    for name in union_keys(before.values(), after.values()) {
        let b = before.value(name);
        let a = after.value(name);
        let kind = classify_value(b, a, &comparer);
        record(path, "value", &mut changes.values, name.to_string(), b, a, kind);
    }

    let counts = changes.counts();
    log_op_end!(
        "diff_snapshots",
        duration_ms = start.elapsed().as_millis() as u64,
        package = path,
        function_count = changes.functions.len(),
        type_count = changes.types.len(),
        value_count = changes.values.len(),
        breaking_count = counts.failing()
    );

    changes
}

/// Diff every package of two bundles. A package missing on one side is
/// compared against an empty snapshot.
pub fn diff_bundles(before: &SnapshotBundle, after: &SnapshotBundle, policy: &CompatPolicy) -> BundleChanges {
    log_op_start!("diff_bundles");
    let start = std::time::Instant::now();

    let mut packages = BTreeMap::new();
    for path in union_keys(before.packages(), after.packages()) {
        let empty = Snapshot::empty(path);
        let b = before.get(path).unwrap_or(&empty);
        let a = after.get(path).unwrap_or(&empty);
        packages.insert(path.to_string(), diff_snapshots(b, a, policy));
    }

    let changes = BundleChanges {
        identity: DiffIdentity {
            before_digest: before.digest(),
            after_digest: after.digest(),
        },
        packages,
    };

    log_op_end!(
        "diff_bundles",
        duration_ms = start.elapsed().as_millis() as u64,
        breaking_count = changes.counts().failing()
    );

    changes
}

/// Methods and free functions of a type share one member namespace.
fn diff_members(
    path: &str,
    before: &TypeDecl,
    after: &TypeDecl,
    comparer: &TypeComparer<'_>,
    functions: &mut BTreeMap<String, Change>,
) {
    let members_before = members(before);
    let members_after = members(after);
    for member in union_keys(&members_before, &members_after) {
        let b = members_before.get(member).copied();
        let a = members_after.get(member).copied();
        let kind = classify_function(b, a, comparer);
        let key = format!("{}.{}", before.name, member);
        record(path, "function", functions, key, b, a, kind);
    }
}

fn members(decl: &TypeDecl) -> BTreeMap<&str, &FunctionDecl> {
    decl.methods
        .iter()
        .chain(&decl.free_funcs)
        .map(|(name, func)| (name.as_str(), func))
        .collect()
}

fn union_keys<'k, K, A, B>(a: &'k BTreeMap<K, A>, b: &'k BTreeMap<K, B>) -> BTreeSet<&'k K>
where
    K: Ord,
{
    a.keys().chain(b.keys()).collect()
}

fn record<D>(
    path: &str,
    category: &'static str,
    out: &mut BTreeMap<String, Change>,
    name: String,
    before: Option<&D>,
    after: Option<&D>,
    kind: ChangeKind,
) where
    D: Clone + Into<Declaration>,
{
    log_decl_classified!(path, category, name, kind);
    out.insert(
        name,
        Change::new(
            before.cloned().map(Into::into),
            after.cloned().map(Into::into),
            kind,
        ),
    );
}
