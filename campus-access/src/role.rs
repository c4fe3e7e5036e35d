//! Roles
//!
//! The closed set of coarse principal classifications. Exactly one role per
//! principal; a role determines the base permission preset.

use crate::AccessError;
use serde::{Deserialize, Serialize};

/// Principal role classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full platform administration
    Administrator,
    /// Content curation
    Editor,
    /// Read-only access
    Viewer,
    /// Customer support
    Support,
}

impl Role {
    /// Every role in the closed set
    pub const ALL: [Role; 4] = [
        Role::Administrator,
        Role::Editor,
        Role::Viewer,
        Role::Support,
    ];

    /// The role assigned at account creation
    pub fn default_for_new_principal() -> Self {
        Role::Viewer
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Administrator => write!(f, "administrator"),
            Role::Editor => write!(f, "editor"),
            Role::Viewer => write!(f, "viewer"),
            Role::Support => write!(f, "support"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = AccessError;

    /// Accepts the canonical spellings plus the legacy `admin`/`user`
    /// spellings persisted by the previous platform generation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "administrator" | "admin" => Ok(Role::Administrator),
            "editor" => Ok(Role::Editor),
            "viewer" | "user" => Ok(Role::Viewer),
            "support" => Ok(Role::Support),
            _ => Err(AccessError::UnknownRole {
                role: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_legacy_spellings() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Administrator);
        assert_eq!("user".parse::<Role>().unwrap(), Role::Viewer);
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("moderator".parse::<Role>().is_err());
        // case-sensitive, same as permission tokens
        assert!("Administrator".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Role::Administrator).unwrap();
        assert_eq!(json, "\"administrator\"");
        let role: Role = serde_json::from_str("\"support\"").unwrap();
        assert_eq!(role, Role::Support);
    }

    #[test]
    fn test_default_role_for_new_accounts() {
        assert_eq!(Role::default_for_new_principal(), Role::Viewer);
    }
}
