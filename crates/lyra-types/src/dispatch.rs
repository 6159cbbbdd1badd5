//! Virtual-dispatch override resolution over the superclass graph.

use std::collections::{HashSet, VecDeque};

use lyra_core::TypeName;

use crate::{java, MethodSig, TypeEnv};

/// Find the superclass method that `sig` overrides.
///
/// The declaring class is resolved by name; its direct supers are then walked
/// in level order (all of a class's supers before any of their supers).
/// Matching is by method name only, and within one class the first matching
/// declaration wins. A super that is not registered in `env` is skipped
/// without extending the frontier. Each class is visited at most once, so a
/// cyclic hierarchy terminates — with `None` when nothing matched.
pub fn find_overridden_method(env: &TypeEnv, sig: &MethodSig) -> Option<MethodSig> {
    let declaring = java::resolve_class(env, sig.owner.as_str())?;

    let mut queue: VecDeque<TypeName> = declaring.supers.iter().cloned().collect();
    let mut seen: HashSet<TypeName> = HashSet::new();

    while let Some(super_name) = queue.pop_front() {
        if !seen.insert(super_name.clone()) {
            continue;
        }

        let Some(super_def) = env.get(&super_name) else {
            continue;
        };

        if let Some(found) = super_def.methods.iter().find(|m| m.name == sig.name) {
            return Some(found.clone());
        }

        queue.extend(super_def.supers.iter().cloned());
    }

    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::StructType;

    fn class(env: &mut TypeEnv, name: &str, supers: &[&str], methods: &[&str]) {
        env.define(
            TypeName::new(name),
            StructType {
                supers: supers.iter().map(TypeName::new).collect(),
                methods: methods.iter().map(|m| MethodSig::new(name, *m)).collect(),
                ..StructType::default()
            },
        );
    }

    #[test]
    fn finds_method_in_direct_super() {
        let mut env = TypeEnv::new();
        class(&mut env, "a.Base", &[], &["run"]);
        class(&mut env, "a.Sub", &["a.Base"], &["run"]);

        let found = find_overridden_method(&env, &MethodSig::new("a.Sub", "run")).unwrap();
        assert_eq!(found.owner, TypeName::new("a.Base"));
        assert_eq!(found.name, "run");
    }

    #[test]
    fn walks_level_order_not_depth_first() {
        // C extends B, A (in that order); B extends D; A extends D.
        // Both A and D declare `m`. Level order checks B then A before
        // descending to D, so A's declaration wins; a depth-first walk would
        // have reached D through B first.
        let mut env = TypeEnv::new();
        class(&mut env, "a.D", &[], &["m"]);
        class(&mut env, "a.B", &["a.D"], &[]);
        class(&mut env, "a.A", &["a.D"], &["m"]);
        class(&mut env, "a.C", &["a.B", "a.A"], &["m"]);

        let found = find_overridden_method(&env, &MethodSig::new("a.C", "m")).unwrap();
        assert_eq!(found.owner, TypeName::new("a.A"));
    }

    #[test]
    fn descends_only_after_exhausting_a_level() {
        // Same diamond, but only D declares `m`: the search confirms neither
        // B nor A declares it before finding D's.
        let mut env = TypeEnv::new();
        class(&mut env, "a.D", &[], &["m"]);
        class(&mut env, "a.B", &["a.D"], &[]);
        class(&mut env, "a.A", &["a.D"], &[]);
        class(&mut env, "a.C", &["a.B", "a.A"], &["m"]);

        let found = find_overridden_method(&env, &MethodSig::new("a.C", "m")).unwrap();
        assert_eq!(found.owner, TypeName::new("a.D"));
    }

    #[test]
    fn first_declaration_in_a_class_wins() {
        let mut env = TypeEnv::new();
        let first = MethodSig::new("a.Base", "run").with_return_type("int");
        let second = MethodSig::new("a.Base", "run").with_return_type("long");
        env.define(
            TypeName::new("a.Base"),
            StructType {
                methods: vec![first.clone(), second],
                ..StructType::default()
            },
        );
        class(&mut env, "a.Sub", &["a.Base"], &["run"]);

        let found = find_overridden_method(&env, &MethodSig::new("a.Sub", "run")).unwrap();
        assert_eq!(found, first);
    }

    #[test]
    fn unregistered_declaring_class_misses() {
        let env = TypeEnv::new();
        assert_eq!(
            find_overridden_method(&env, &MethodSig::new("no.Such", "run")),
            None
        );
    }

    #[test]
    fn unregistered_super_is_skipped() {
        let mut env = TypeEnv::new();
        class(&mut env, "a.Base", &[], &["run"]);
        class(&mut env, "a.Sub", &["a.Ghost", "a.Base"], &["run"]);

        let found = find_overridden_method(&env, &MethodSig::new("a.Sub", "run")).unwrap();
        assert_eq!(found.owner, TypeName::new("a.Base"));
    }

    #[test]
    fn no_match_exhausts_the_queue() {
        let mut env = TypeEnv::new();
        class(&mut env, "a.Base", &[], &["other"]);
        class(&mut env, "a.Sub", &["a.Base"], &["run"]);

        assert_eq!(
            find_overridden_method(&env, &MethodSig::new("a.Sub", "run")),
            None
        );
    }

    #[test]
    fn cyclic_hierarchy_terminates() {
        let mut env = TypeEnv::new();
        class(&mut env, "a.A", &["a.B"], &["m"]);
        class(&mut env, "a.B", &["a.A"], &[]);

        assert_eq!(
            find_overridden_method(&env, &MethodSig::new("a.A", "missing")),
            None
        );
    }

    #[test]
    fn duplicate_supers_are_visited_once() {
        let mut env = TypeEnv::new();
        class(&mut env, "a.Base", &[], &["run"]);
        class(&mut env, "a.Sub", &["a.Base", "a.Base"], &["run"]);

        let found = find_overridden_method(&env, &MethodSig::new("a.Sub", "run")).unwrap();
        assert_eq!(found.owner, TypeName::new("a.Base"));
    }
}
