//! Structural type comparison.
//!
//! [`TypeComparer::compare`] answers whether a value of the `before` type can
//! be replaced by the `after` type: exported struct fields are matched by
//! name, everything else by canonical text, with two relaxations for basic
//! kinds (untyped constants and shared representations).

use crate::compare::{presence, Presence};
use crate::config::CompatPolicy;
use crate::diff::ChangeKind;
use crate::model::{BasicKind, Field, Snapshot, TypeDecl, TypeShape};
use std::collections::{BTreeMap, HashSet};

/// Outcome of comparing two type shapes. Ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Compatibility {
    Incompatible,
    Compatible,
    Identical,
}

impl Compatibility {
    /// Classification of a declaration whose shape compared this way.
    pub fn change_kind(self) -> ChangeKind {
        match self {
            Compatibility::Identical => ChangeKind::Unchanged,
            Compatibility::Compatible => ChangeKind::Compatible,
            Compatibility::Incompatible => ChangeKind::Breaking,
        }
    }
}

/// Lookup of named types declared in one snapshot.
pub trait TypeEnv {
    fn underlying(&self, name: &str) -> Option<&TypeShape>;
}

impl TypeEnv for Snapshot {
    fn underlying(&self, name: &str) -> Option<&TypeShape> {
        self.underlying_of(name)
    }
}

/// Environment with no declared types; only inline underlyings resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnv;

impl TypeEnv for NoEnv {
    fn underlying(&self, _name: &str) -> Option<&TypeShape> {
        None
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Before,
    After,
}

/// Named-type pairs currently being expanded.
#[derive(Default)]
struct Walk {
    in_progress: HashSet<(String, String)>,
}

/// Compares type shapes from a `before` and an `after` snapshot.
#[derive(Clone, Copy)]
pub struct TypeComparer<'a> {
    before: &'a dyn TypeEnv,
    after: &'a dyn TypeEnv,
    policy: &'a CompatPolicy,
}

impl std::fmt::Debug for TypeComparer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeComparer")
            .field("policy", self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for TypeComparer<'static> {
    fn default() -> Self {
        Self::detached(&CompatPolicy::DEFAULT)
    }
}

impl<'a> TypeComparer<'a> {
    pub fn new(before: &'a dyn TypeEnv, after: &'a dyn TypeEnv, policy: &'a CompatPolicy) -> Self {
        Self {
            before,
            after,
            policy,
        }
    }

    /// A comparer that resolves only inline named underlyings.
    pub fn detached(policy: &'a CompatPolicy) -> Self {
        Self {
            before: &NoEnv,
            after: &NoEnv,
            policy,
        }
    }

    pub fn policy(&self) -> &CompatPolicy {
        self.policy
    }

    /// Compare `t1` (before) against `t2` (after).
    pub fn compare(&self, t1: &TypeShape, t2: &TypeShape) -> Compatibility {
        let mut walk = Walk::default();
        self.compare_in(&mut walk, t1, t2, 0)
    }

    fn compare_in(&self, walk: &mut Walk, t1: &TypeShape, t2: &TypeShape, depth: usize) -> Compatibility {
        if depth > self.policy.max_depth {
            tracing::debug!(depth, before = %t1, after = %t2, "type comparison depth exceeded");
            // Past the bound only an exact textual match survives.
            return if t1.same_text(t2) {
                Compatibility::Identical
            } else {
                Compatibility::Incompatible
            };
        }

        if let (TypeShape::Struct { fields: f1 }, TypeShape::Struct { fields: f2 }) = (t1, t2) {
            return self.compare_structs(walk, f1, f2, depth);
        }

        if t1.same_text(t2) {
            return Compatibility::Identical;
        }

        self.compare_basics(t1, t2, depth)
    }

    /// Exported fields by name, order-insensitive. Every old field must
    /// survive; new fields downgrade the result to `Compatible`.
    fn compare_structs(
        &self,
        walk: &mut Walk,
        f1: &[Field],
        f2: &[Field],
        depth: usize,
    ) -> Compatibility {
        let fields1: BTreeMap<&str, &TypeShape> = f1
            .iter()
            .filter(|f| f.exported)
            .map(|f| (f.name.as_str(), &f.ty))
            .collect();
        let fields2: BTreeMap<&str, &TypeShape> = f2
            .iter()
            .filter(|f| f.exported)
            .map(|f| (f.name.as_str(), &f.ty))
            .collect();

        let mut identical = true;
        for (name, ty1) in &fields1 {
            let Some(ty2) = fields2.get(name) else {
                return Compatibility::Incompatible;
            };
            match self.compare_fields(walk, ty1, ty2, depth + 1) {
                Compatibility::Identical => {}
                Compatibility::Compatible => identical = false,
                Compatibility::Incompatible => return Compatibility::Incompatible,
            }
        }

        if fields2.keys().any(|name| !fields1.contains_key(name)) {
            identical = false;
        }

        if identical {
            Compatibility::Identical
        } else {
            Compatibility::Compatible
        }
    }

    /// Field types compare by their underlying shapes.
    fn compare_fields(&self, walk: &mut Walk, t1: &TypeShape, t2: &TypeShape, depth: usize) -> Compatibility {
        let named = matches!(t1, TypeShape::Named { .. }) || matches!(t2, TypeShape::Named { .. });
        if !named {
            return self.compare_in(walk, t1, t2, depth);
        }

        let key = (t1.canonical(), t2.canonical());
        if walk.in_progress.contains(&key) {
            // Revisiting a pair under expansion: assume it holds and let the
            // non-recursive parts decide.
            return Compatibility::Identical;
        }

        let u1 = self.underlying(t1, Side::Before);
        let u2 = self.underlying(t2, Side::After);
        walk.in_progress.insert(key.clone());
        let result = self.compare_in(walk, u1, u2, depth);
        walk.in_progress.remove(&key);
        result
    }

    /// Untyped constants and representation-sharing basic kinds.
    fn compare_basics(&self, t1: &TypeShape, t2: &TypeShape, depth: usize) -> Compatibility {
        let (Some(b1), Some(b2)) = (
            self.basic_of(t1, Side::Before, depth),
            self.basic_of(t2, Side::After, depth),
        ) else {
            return Compatibility::Incompatible;
        };

        let (k1, untyped1) = b1;
        let (k2, untyped2) = b2;

        if untyped1 && !untyped2 {
            let class = k1.value_class();
            if class & k2.value_class() == class {
                return Compatibility::Compatible;
            }
            return Compatibility::Incompatible;
        }

        if !untyped1
            && !untyped2
            && self.policy.named_basic_compatible
            && k1.representation() == k2.representation()
        {
            return Compatibility::Compatible;
        }

        Compatibility::Incompatible
    }

    /// Basic kind behind a shape, following named types to their underlying.
    /// Untyped kinds only appear directly, never behind a name.
    fn basic_of(
        &self,
        t: &TypeShape,
        side: Side,
        depth: usize,
    ) -> Option<(BasicKind, bool)> {
        let mut current = t;
        let mut hops = depth;
        loop {
            match current {
                TypeShape::Basic { basic, untyped } => {
                    let through_name = !std::ptr::eq(current, t);
                    if through_name && *untyped {
                        return None;
                    }
                    return Some((*basic, *untyped));
                }
                TypeShape::Named { .. } => {
                    let next = self.underlying(current, side);
                    if std::ptr::eq(next, current) || hops >= self.policy.max_depth {
                        return None;
                    }
                    current = next;
                    hops += 1;
                }
                _ => return None,
            }
        }
    }

    /// Underlying shape: inline for named types that carry one, otherwise
    /// looked up in the side's environment. Unresolvable names stay opaque.
    fn underlying<'t>(&'t self, t: &'t TypeShape, side: Side) -> &'t TypeShape {
        match t {
            TypeShape::Named {
                underlying: Some(u),
                ..
            } => u,
            TypeShape::Named {
                name,
                underlying: None,
            } => {
                let env = match side {
                    Side::Before => self.before,
                    Side::After => self.after,
                };
                env.underlying(name).unwrap_or(t)
            }
            other => other,
        }
    }
}

/// Compare two shapes with the default policy and no declared types.
pub fn compare_types(t1: &TypeShape, t2: &TypeShape) -> Compatibility {
    TypeComparer::default().compare(t1, t2)
}

/// Classify a type declaration pair.
pub fn classify_type(
    before: Option<&TypeDecl>,
    after: Option<&TypeDecl>,
    comparer: &TypeComparer<'_>,
) -> ChangeKind {
    match presence(before, after) {
        Presence::Settled(kind) => kind,
        Presence::Both(b, a) => {
            if b.canonical() == a.canonical() {
                return ChangeKind::Unchanged;
            }
            comparer.compare(&b.underlying, &a.underlying).change_kind()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FunctionDecl, Signature};

    fn st(fields: Vec<Field>) -> TypeShape {
        TypeShape::struct_of(fields)
    }

    #[test]
    fn test_identical_text_is_identical() {
        let t = TypeShape::map(TypeShape::string(), TypeShape::slice(TypeShape::int()));
        assert_eq!(compare_types(&t, &t.clone()), Compatibility::Identical);
    }

    #[test]
    fn test_struct_field_added_is_compatible() {
        let before = st(vec![Field::new("Foo", TypeShape::string())]);
        let after = st(vec![
            Field::new("Foo", TypeShape::string()),
            Field::new("Bar", TypeShape::bool()),
        ]);
        assert_eq!(compare_types(&before, &after), Compatibility::Compatible);
        // Directional: dropping the field is breaking.
        assert_eq!(compare_types(&after, &before), Compatibility::Incompatible);
    }

    #[test]
    fn test_struct_field_renamed_is_incompatible() {
        let before = st(vec![Field::new("Foo", TypeShape::string())]);
        let after = st(vec![Field::new("XXX", TypeShape::string())]);
        assert_eq!(compare_types(&before, &after), Compatibility::Incompatible);
    }

    #[test]
    fn test_struct_field_order_and_unexported_ignored() {
        let before = st(vec![
            Field::new("A", TypeShape::int()),
            Field::new("B", TypeShape::string()),
        ]);
        let after = st(vec![
            Field::new("B", TypeShape::string()),
            Field::new("hidden", TypeShape::interface(Default::default())),
            Field::new("A", TypeShape::int()),
        ]);
        assert_eq!(compare_types(&before, &after), Compatibility::Identical);
    }

    #[test]
    fn test_struct_field_type_changed_is_incompatible() {
        let before = st(vec![Field::new("YYY", TypeShape::int())]);
        let after = st(vec![Field::new("YYY", TypeShape::string())]);
        assert_eq!(compare_types(&before, &after), Compatibility::Incompatible);
    }

    #[test]
    fn test_nested_compatible_field_downgrades() {
        let inner_before = st(vec![Field::new("X", TypeShape::int())]);
        let inner_after = st(vec![
            Field::new("X", TypeShape::int()),
            Field::new("Y", TypeShape::int()),
        ]);
        let before = st(vec![Field::new("Opts", inner_before)]);
        let after = st(vec![Field::new("Opts", inner_after)]);
        assert_eq!(compare_types(&before, &after), Compatibility::Compatible);
    }

    #[test]
    fn test_named_field_expands_through_snapshot() {
        let before = Snapshot::builder("p")
            .type_decl(TypeDecl::new(
                "Opts",
                st(vec![Field::new("X", TypeShape::int())]),
            ))
            .build()
            .unwrap();
        let after = Snapshot::builder("p")
            .type_decl(TypeDecl::new(
                "Opts",
                st(vec![
                    Field::new("X", TypeShape::int()),
                    Field::new("Y", TypeShape::int()),
                ]),
            ))
            .build()
            .unwrap();
        let policy = CompatPolicy::default();
        let cmp = TypeComparer::new(&before, &after, &policy);

        let outer = st(vec![Field::new("Opts", TypeShape::named("Opts"))]);
        assert_eq!(cmp.compare(&outer, &outer), Compatibility::Compatible);
        // Without the environment the names are opaque and print the same.
        assert_eq!(compare_types(&outer, &outer), Compatibility::Identical);
    }

    #[test]
    fn test_self_referential_struct_terminates() {
        // type Node struct { Value int; Next Node } is not a valid Go program,
        // but a snapshot can still describe it.
        let before = Snapshot::builder("p")
            .type_decl(TypeDecl::new(
                "Node",
                st(vec![
                    Field::new("Value", TypeShape::int()),
                    Field::new("Next", TypeShape::named("Node")),
                ]),
            ))
            .build()
            .unwrap();
        let after = Snapshot::builder("p")
            .type_decl(TypeDecl::new(
                "Node",
                st(vec![
                    Field::new("Value", TypeShape::int()),
                    Field::new("Next", TypeShape::named("Node")),
                    Field::new("Label", TypeShape::string()),
                ]),
            ))
            .build()
            .unwrap();
        let policy = CompatPolicy::default();
        let cmp = TypeComparer::new(&before, &after, &policy);
        let b = before.underlying_of("Node").unwrap();
        let a = after.underlying_of("Node").unwrap();
        assert_eq!(cmp.compare(b, a), Compatibility::Compatible);
        assert_eq!(cmp.compare(a, b), Compatibility::Incompatible);

        let same = TypeComparer::new(&before, &before, &policy);
        assert_eq!(same.compare(b, b), Compatibility::Identical);
    }

    #[test]
    fn test_untyped_to_typed_matching_class() {
        let untyped_int = TypeShape::untyped(BasicKind::Int);
        assert_eq!(
            compare_types(&untyped_int, &TypeShape::basic(BasicKind::Int64)),
            Compatibility::Compatible
        );
        assert_eq!(
            compare_types(&untyped_int, &TypeShape::basic(BasicKind::Uint8)),
            Compatibility::Compatible
        );
        assert_eq!(
            compare_types(&untyped_int, &TypeShape::string()),
            Compatibility::Incompatible
        );
        assert_eq!(
            compare_types(&TypeShape::untyped(BasicKind::String), &TypeShape::string()),
            Compatibility::Compatible
        );
    }

    #[test]
    fn test_untyped_to_named_basic() {
        let level = TypeShape::named_with("Level", TypeShape::int());
        assert_eq!(
            compare_types(&TypeShape::untyped(BasicKind::Int), &level),
            Compatibility::Compatible
        );
    }

    #[test]
    fn test_typed_to_untyped_is_incompatible() {
        assert_eq!(
            compare_types(&TypeShape::string(), &TypeShape::untyped(BasicKind::String)),
            Compatibility::Incompatible
        );
        assert_eq!(
            compare_types(
                &TypeShape::untyped(BasicKind::Int),
                &TypeShape::untyped(BasicKind::Float64)
            ),
            Compatibility::Incompatible
        );
    }

    #[test]
    fn test_shared_representation() {
        assert_eq!(
            compare_types(&TypeShape::byte(), &TypeShape::basic(BasicKind::Uint8)),
            Compatibility::Compatible
        );
        let a = TypeShape::named_with("A", TypeShape::basic(BasicKind::Uint8));
        let b = TypeShape::named_with("B", TypeShape::byte());
        assert_eq!(compare_types(&a, &b), Compatibility::Compatible);
        // No numeric widening.
        assert_eq!(
            compare_types(&TypeShape::basic(BasicKind::Int32), &TypeShape::basic(BasicKind::Int64)),
            Compatibility::Incompatible
        );
    }

    #[test]
    fn test_shared_representation_respects_policy() {
        let policy = CompatPolicy {
            named_basic_compatible: false,
            ..CompatPolicy::DEFAULT
        };
        let cmp = TypeComparer::detached(&policy);
        assert_eq!(
            cmp.compare(&TypeShape::byte(), &TypeShape::basic(BasicKind::Uint8)),
            Compatibility::Incompatible
        );
    }

    #[test]
    fn test_pointer_elements_compare_by_text() {
        let before = TypeShape::pointer(st(vec![Field::new("A", TypeShape::int())]));
        let after = TypeShape::pointer(st(vec![
            Field::new("A", TypeShape::int()),
            Field::new("B", TypeShape::int()),
        ]));
        assert_eq!(compare_types(&before, &after), Compatibility::Incompatible);
    }

    #[test]
    fn test_depth_limit() {
        let policy = CompatPolicy {
            max_depth: 1,
            ..CompatPolicy::DEFAULT
        };
        let cmp = TypeComparer::detached(&policy);
        let deep = |leaf: TypeShape| {
            st(vec![Field::new(
                "A",
                st(vec![Field::new("B", st(vec![Field::new("C", leaf)]))]),
            )])
        };
        let narrow = deep(st(vec![Field::new("X", TypeShape::int())]));
        let wide = deep(st(vec![
            Field::new("X", TypeShape::int()),
            Field::new("Y", TypeShape::int()),
        ]));
        assert_eq!(cmp.compare(&narrow, &wide), Compatibility::Incompatible);
        assert_eq!(compare_types(&narrow, &wide), Compatibility::Compatible);
    }

    #[test]
    fn test_depth_limit_keeps_reflexivity() {
        let policy = CompatPolicy {
            max_depth: 1,
            ..CompatPolicy::DEFAULT
        };
        let cmp = TypeComparer::detached(&policy);
        let mut t = TypeShape::int();
        for _ in 0..70 {
            t = st(vec![Field::new("Inner", t)]);
        }
        assert_eq!(cmp.compare(&t, &t), Compatibility::Identical);
        assert_eq!(compare_types(&t, &t), Compatibility::Identical);
    }

    #[test]
    fn test_classify_type_decls() {
        let cmp = TypeComparer::default();
        let t1 = TypeDecl::new("T", st(vec![Field::new("Foo", TypeShape::string())]));
        let t2 = TypeDecl::new(
            "T",
            st(vec![
                Field::new("Foo", TypeShape::string()),
                Field::new("Bar", TypeShape::bool()),
            ]),
        );
        assert_eq!(classify_type(Some(&t1), Some(&t1), &cmp), ChangeKind::Unchanged);
        assert_eq!(classify_type(Some(&t1), Some(&t2), &cmp), ChangeKind::Compatible);
        assert_eq!(classify_type(Some(&t2), Some(&t1), &cmp), ChangeKind::Breaking);
        assert_eq!(classify_type(None, Some(&t1), &cmp), ChangeKind::Added);
        assert_eq!(classify_type(Some(&t1), None, &cmp), ChangeKind::Removed);
    }

    #[test]
    fn test_classify_type_unexported_field_only_is_unchanged() {
        let cmp = TypeComparer::default();
        let t1 = TypeDecl::new("T", st(vec![Field::new("Foo", TypeShape::string())]));
        let t2 = TypeDecl::new(
            "T",
            st(vec![
                Field::new("Foo", TypeShape::string()),
                Field::new("xxx", TypeShape::interface(Default::default())),
            ]),
        );
        assert_eq!(classify_type(Some(&t1), Some(&t2), &cmp), ChangeKind::Unchanged);
    }

    #[test]
    fn test_classify_type_ignores_methods() {
        let cmp = TypeComparer::default();
        let t1 = TypeDecl::new("T", TypeShape::int());
        let t2 = TypeDecl::new("T", TypeShape::int()).with_method(FunctionDecl::new(
            "String",
            Signature::new(vec![], vec![TypeShape::string()]),
        ));
        assert_eq!(classify_type(Some(&t1), Some(&t2), &cmp), ChangeKind::Unchanged);
    }
}
