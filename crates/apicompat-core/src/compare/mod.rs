//! Comparators for types, signatures and named values.
//!
//! All comparators are pure and total. They take a [`TypeComparer`] carrying
//! the policy and the type tables of both snapshots.

pub mod signature;
pub mod types;
pub mod value;

pub use signature::{classify_function, classify_signature, signature_compatible};
pub use types::{classify_type, compare_types, Compatibility, NoEnv, TypeComparer, TypeEnv};
pub use value::classify_value;

use crate::diff::ChangeKind;

pub(crate) enum Presence<'d, D> {
    /// Classification decided by presence alone.
    Settled(ChangeKind),
    Both(&'d D, &'d D),
}

pub(crate) fn presence<'d, D>(before: Option<&'d D>, after: Option<&'d D>) -> Presence<'d, D> {
    match (before, after) {
        (Some(b), Some(a)) => Presence::Both(b, a),
        (None, Some(_)) => Presence::Settled(ChangeKind::Added),
        (Some(_), None) => Presence::Settled(ChangeKind::Removed),
        (None, None) => Presence::Settled(ChangeKind::Unchanged),
    }
}
