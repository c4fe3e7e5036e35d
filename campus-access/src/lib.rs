//! Campus Access - Authorization core for the Campus platform
//!
//! This crate binds an incoming request to a principal's effective permission
//! set and lets protected operations declare and enforce the capabilities they
//! require. It is deliberately narrow:
//!
//! - **Catalog**: the closed set of permission tokens the platform recognizes
//! - **Presets**: the base permission set granted by each role
//! - **Principals**: persisted identity records (role + explicit overrides)
//! - **Resolver**: pure `preset ∪ overrides` computation
//! - **Gates**: coarse (role) and fine-grained (capability) enforcement
//!
//! ## Architecture
//!
//! The crate follows a clear separation between:
//! - **Domain core** (this crate): decisions, no HTTP, no storage engine
//! - **Presentation** (campus-web): middleware and management endpoints
//!
//! Every gated decision re-reads the principal record so that a role or
//! override change is visible on the very next request. Any failure along the
//! way is a denial, never an implicit allow.

pub mod catalog;
pub mod gate;
pub mod preset;
pub mod principal;
pub mod resolver;
pub mod role;

pub use catalog::{Permission, PermissionCatalog};
pub use gate::AccessService;
pub use preset::RolePresetStore;
pub use principal::{MemoryPrincipalStore, Principal, PrincipalStore};
pub use resolver::{resolve, EffectivePermissionSet};
pub use role::Role;

use std::collections::{HashMap, HashSet};

/// Authorization error taxonomy
///
/// Every variant is terminal for the current request: retrying an
/// authorization decision cannot change its outcome unless backing data
/// changes, and blind retries would mask fail-closed denials.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// No principal identifier was attached to the request.
    #[error("request carries no principal identifier")]
    NotAuthenticated,

    /// The identifier no longer resolves to a record (e.g. account deleted
    /// after token issuance).
    #[error("principal not found: {principal_id}")]
    PrincipalNotFound { principal_id: String },

    /// An insert collided with an existing record.
    #[error("principal already exists: {principal_id}")]
    PrincipalExists { principal_id: String },

    /// Principal resolved but does not meet the requirement. Carries the
    /// unmet requirement for audit logging and UI messaging; never the
    /// principal's full effective set.
    #[error("access denied: requires {requirement}")]
    Forbidden { requirement: String },

    /// An administrative write referenced a token outside the catalog.
    #[error("unknown permission: {token}")]
    InvalidPermission { token: String },

    /// Preset lookup for a role with no registered preset. Unreachable with
    /// the seeded defaults, but a defined outcome nonetheless.
    #[error("no preset registered for role: {role}")]
    PresetNotFound { role: String },

    /// A role string outside the closed role set.
    #[error("unknown role: {role}")]
    UnknownRole { role: String },

    /// The storage collaborator failed. Treated as a hard deny by callers.
    #[error("storage error: {message}")]
    Storage { message: String },
}

pub type AccessResult<T> = Result<T, AccessError>;

impl AccessError {
    /// Create a forbidden error naming the unmet requirement
    pub fn forbidden<S: Into<String>>(requirement: S) -> Self {
        Self::Forbidden {
            requirement: requirement.into(),
        }
    }

    /// Create an invalid-permission error for a token outside the catalog
    pub fn invalid_permission<S: Into<String>>(token: S) -> Self {
        Self::InvalidPermission {
            token: token.into(),
        }
    }

    /// Create a principal-not-found error
    pub fn principal_not_found<S: Into<String>>(principal_id: S) -> Self {
        Self::PrincipalNotFound {
            principal_id: principal_id.into(),
        }
    }

    /// Create a storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Authorization core configuration
///
/// Bundles the permission catalog with the role presets the store is seeded
/// from. The defaults reproduce the platform's deploy-time catalog and
/// presets.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// The closed set of recognized permission tokens
    pub catalog: PermissionCatalog,
    /// Initial preset per role; validated against the catalog at build time
    pub presets: HashMap<Role, HashSet<Permission>>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        let catalog = PermissionCatalog::default();
        Self {
            presets: preset::default_presets(&catalog),
            catalog,
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use super::{
        AccessConfig, AccessError, AccessResult, AccessService, EffectivePermissionSet,
        MemoryPrincipalStore, Permission, PermissionCatalog, Principal, PrincipalStore, Role,
    };
}
