//! Function and method signature compatibility.

use crate::compare::types::TypeComparer;
use crate::compare::{presence, Presence};
use crate::diff::ChangeKind;
use crate::model::{FunctionDecl, Signature, TypeShape};

/// Classify a function (or method) declaration pair.
pub fn classify_function(
    before: Option<&FunctionDecl>,
    after: Option<&FunctionDecl>,
    comparer: &TypeComparer<'_>,
) -> ChangeKind {
    match presence(before, after) {
        Presence::Settled(kind) => kind,
        Presence::Both(b, a) => classify_signature(&b.signature, &a.signature, comparer),
    }
}

/// Classify a signature pair that exists on both sides.
pub fn classify_signature(s1: &Signature, s2: &Signature, comparer: &TypeComparer<'_>) -> ChangeKind {
    if s1.to_string() == s2.to_string() {
        ChangeKind::Unchanged
    } else if signature_compatible(s1, s2, comparer) {
        ChangeKind::Compatible
    } else {
        ChangeKind::Breaking
    }
}

/// Whether every call site written against `s1` still compiles against `s2`.
pub fn signature_compatible(s1: &Signature, s2: &Signature, comparer: &TypeComparer<'_>) -> bool {
    params_compatible(s1, s2) && results_compatible(s1, s2, comparer)
}

/// Parameters may only grow by a single trailing variadic parameter. At
/// equal arity the variadic flag is not consulted.
pub fn params_compatible(s1: &Signature, s2: &Signature) -> bool {
    match shared_prefix(&s1.params, &s2.params) {
        Some(0) => true,
        Some(1) => !s1.variadic && s2.variadic,
        _ => false,
    }
}

/// Results may grow freely when there were none before. Otherwise appending
/// results is governed by the policy.
pub fn results_compatible(s1: &Signature, s2: &Signature, comparer: &TypeComparer<'_>) -> bool {
    if s1.results.is_empty() {
        return true;
    }
    match shared_prefix(&s1.results, &s2.results) {
        Some(0) => true,
        Some(_) => comparer.policy().allow_result_extension,
        None => false,
    }
}

/// Number of trailing extra entries in `after`, or `None` if `after` is
/// shorter or a shared position differs. Positions match on canonical text:
/// field order and unexported fields of a struct parameter are part of its
/// identity.
fn shared_prefix(before: &[TypeShape], after: &[TypeShape]) -> Option<usize> {
    if before.len() > after.len() {
        return None;
    }
    before
        .iter()
        .zip(after)
        .all(|(t1, t2)| t1.same_text(t2))
        .then(|| after.len() - before.len())
}
