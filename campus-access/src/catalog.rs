//! Permission Catalog
//!
//! The closed set of permission tokens the platform recognizes. The catalog
//! is consulted when presets or principal overrides are written; the
//! enforcement path never touches it.

use crate::{AccessError, AccessResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An atomic, namespaced capability token of the form `<resource>:<action>`
/// (e.g. `user:edit`). Tokens are case-sensitive and carry no implicit
/// hierarchy: `user:edit` does not imply `user:view`.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(String);

impl Permission {
    /// Parse a token, rejecting anything that is not `<resource>:<action>`
    /// with both parts non-empty.
    pub fn parse(token: &str) -> AccessResult<Self> {
        match token.split_once(':') {
            Some((resource, action))
                if !resource.is_empty() && !action.is_empty() && !action.contains(':') =>
            {
                Ok(Self(token.to_string()))
            }
            _ => Err(AccessError::invalid_permission(token)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Permission {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// The closed set of permission tokens recognized by the deployment.
///
/// Fixed at deploy time; administratively extending it must not invalidate
/// already-granted tokens that remain in the set.
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    tokens: HashSet<Permission>,
}

impl PermissionCatalog {
    /// Build a catalog from raw tokens, rejecting malformed ones
    pub fn from_tokens<I, S>(tokens: I) -> AccessResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokens
            .into_iter()
            .map(|t| Permission::parse(t.as_ref()))
            .collect::<AccessResult<HashSet<_>>>()?;
        Ok(Self { tokens })
    }

    /// Whether a token is part of the catalog
    pub fn exists(&self, permission: &Permission) -> bool {
        self.tokens.contains(permission)
    }

    /// All recognized tokens
    pub fn all(&self) -> &HashSet<Permission> {
        &self.tokens
    }

    /// Validate a set of tokens against the catalog, failing on the first
    /// unknown one. Used by write paths before any state is touched.
    pub fn validate_all<'a, I>(&self, permissions: I) -> AccessResult<()>
    where
        I: IntoIterator<Item = &'a Permission>,
    {
        for permission in permissions {
            if !self.exists(permission) {
                return Err(AccessError::invalid_permission(permission.as_str()));
            }
        }
        Ok(())
    }
}

impl Default for PermissionCatalog {
    /// The platform's deploy-time catalog
    fn default() -> Self {
        Self::from_tokens([
            "user:create",
            "user:edit",
            "user:delete",
            "user:view",
            "content:publish",
            "content:categories",
            "billing:view",
            "billing:manage",
        ])
        .expect("default catalog tokens are well-formed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_token() {
        let permission = Permission::parse("user:edit").unwrap();
        assert_eq!(permission.as_str(), "user:edit");
        assert_eq!(permission.to_string(), "user:edit");
    }

    #[test]
    fn test_parse_rejects_malformed_tokens() {
        for token in ["", "user", ":edit", "user:", "user:edit:all"] {
            let result = Permission::parse(token);
            assert!(
                matches!(result, Err(AccessError::InvalidPermission { .. })),
                "token {:?} should be rejected",
                token
            );
        }
    }

    #[test]
    fn test_tokens_are_case_sensitive() {
        let lower = Permission::parse("user:edit").unwrap();
        let upper = Permission::parse("User:Edit").unwrap();
        assert_ne!(lower, upper);

        let catalog = PermissionCatalog::default();
        assert!(catalog.exists(&lower));
        assert!(!catalog.exists(&upper));
    }

    #[test]
    fn test_default_catalog_contents() {
        let catalog = PermissionCatalog::default();
        assert_eq!(catalog.all().len(), 8);
        assert!(catalog.exists(&Permission::parse("billing:manage").unwrap()));
        assert!(!catalog.exists(&Permission::parse("post:delete").unwrap()));
    }

    #[test]
    fn test_validate_all_names_unknown_token() {
        let catalog = PermissionCatalog::default();
        let permissions = vec![
            Permission::parse("user:view").unwrap(),
            Permission::parse("post:delete").unwrap(),
        ];

        let err = catalog.validate_all(&permissions).unwrap_err();
        match err {
            AccessError::InvalidPermission { token } => assert_eq!(token, "post:delete"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
