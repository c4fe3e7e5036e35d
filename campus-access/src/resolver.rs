//! Permission Resolver
//!
//! Pure computation of a principal's effective permission set. No I/O, no
//! hidden state: the result is a function of the preset and overrides passed
//! in, recomputed on every authorization decision and never cached across
//! requests.

use crate::Permission;
use std::collections::HashSet;

/// Derived, never persisted: the union of a role preset and a principal's
/// explicit overrides. Membership testing is the operative query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectivePermissionSet {
    grants: HashSet<Permission>,
}

impl EffectivePermissionSet {
    pub fn contains(&self, permission: &Permission) -> bool {
        self.grants.contains(permission)
    }

    /// Whether every required token is granted
    pub fn has_all(&self, required: &[Permission]) -> bool {
        required.iter().all(|p| self.grants.contains(p))
    }

    /// The required tokens that are not granted, in the order they were
    /// required. Empty iff `has_all` holds.
    pub fn missing(&self, required: &[Permission]) -> Vec<Permission> {
        required
            .iter()
            .filter(|p| !self.grants.contains(*p))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

/// Resolve the effective permission set: `preset ∪ overrides`.
///
/// Total and deterministic; duplicates collapse. O(|preset| + |overrides|).
pub fn resolve(
    preset: &HashSet<Permission>,
    overrides: &HashSet<Permission>,
) -> EffectivePermissionSet {
    EffectivePermissionSet {
        grants: preset.union(overrides).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Permission;

    fn perms(tokens: &[&str]) -> HashSet<Permission> {
        tokens
            .iter()
            .map(|t| Permission::parse(t).unwrap())
            .collect()
    }

    fn perm(token: &str) -> Permission {
        Permission::parse(token).unwrap()
    }

    #[test]
    fn test_resolver_never_loses_a_grant() {
        let preset = perms(&["post:view", "post:edit"]);
        let overrides = perms(&["post:delete", "billing:view"]);

        let effective = resolve(&preset, &overrides);

        for granted in preset.iter().chain(overrides.iter()) {
            assert!(effective.contains(granted), "lost grant {granted}");
        }
        assert_eq!(effective.len(), 4);
    }

    #[test]
    fn test_duplicates_collapse() {
        let preset = perms(&["post:view", "post:edit"]);
        let overrides = perms(&["post:edit"]);

        let effective = resolve(&preset, &overrides);
        assert_eq!(effective.len(), 2);
    }

    #[test]
    fn test_empty_sources() {
        let effective = resolve(&HashSet::new(), &HashSet::new());
        assert!(effective.is_empty());
        assert!(effective.has_all(&[]));
        assert!(!effective.has_all(&[perm("post:view")]));
    }

    #[test]
    fn test_missing_names_exactly_the_unmet_tokens() {
        let effective = resolve(&perms(&["post:edit", "post:view"]), &HashSet::new());

        let required = vec![perm("post:edit"), perm("post:delete")];
        assert!(!effective.has_all(&required));
        assert_eq!(effective.missing(&required), vec![perm("post:delete")]);
    }

    #[test]
    fn test_flipping_a_token_out_flips_the_decision() {
        let required = vec![perm("post:edit"), perm("post:view")];

        let full = resolve(&perms(&["post:edit", "post:view"]), &HashSet::new());
        assert!(full.has_all(&required));

        let reduced = resolve(&perms(&["post:view"]), &HashSet::new());
        assert!(!reduced.has_all(&required));
    }
}
