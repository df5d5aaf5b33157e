//! Constants and variables.

use crate::compare::types::{Compatibility, TypeComparer};
use crate::compare::{presence, Presence};
use crate::diff::ChangeKind;
use crate::model::ValueDecl;

/// Classify a named value pair.
///
/// A variable that becomes a constant is always breaking: it can no longer be
/// assigned or have its address taken. A constant that becomes a variable is
/// compatible as long as its type still accepts every use.
pub fn classify_value(
    before: Option<&ValueDecl>,
    after: Option<&ValueDecl>,
    comparer: &TypeComparer<'_>,
) -> ChangeKind {
    let (b, a) = match presence(before, after) {
        Presence::Settled(kind) => return kind,
        Presence::Both(b, a) => (b, a),
    };

    let transition = match (b.is_constant, a.is_constant) {
        (false, true) => return ChangeKind::Breaking,
        (true, false) => ChangeKind::Compatible,
        _ => ChangeKind::Unchanged,
    };

    match comparer.compare(&b.ty, &a.ty) {
        Compatibility::Incompatible => ChangeKind::Breaking,
        Compatibility::Compatible => ChangeKind::Compatible,
        Compatibility::Identical => transition,
    }
}
