//! Authorization gates
//!
//! `AccessService` renders the allow/deny decision in front of protected
//! operations. Two enforcement modes share one loader: the role gate compares
//! the principal's role against a fixed required role, the capability gate
//! checks the effective permission set against an operation's declared
//! requirements. Both re-read the principal record on every call so a role or
//! override change takes effect on the very next request, and both fail
//! closed.

use crate::{
    preset::RolePresetStore, resolver, AccessConfig, AccessError, AccessResult,
    EffectivePermissionSet, Permission, PermissionCatalog, Principal, PrincipalStore, Role,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Authorization decision service
pub struct AccessService {
    catalog: Arc<PermissionCatalog>,
    presets: RolePresetStore,
    principals: Arc<dyn PrincipalStore>,
}

impl AccessService {
    /// Create a service over the given principal storage, seeded with the
    /// configured catalog and presets.
    pub fn new(config: AccessConfig, principals: Arc<dyn PrincipalStore>) -> AccessResult<Self> {
        let catalog = Arc::new(config.catalog);
        let presets = RolePresetStore::new(catalog.clone(), config.presets)?;

        Ok(Self {
            catalog,
            presets,
            principals,
        })
    }

    /// The closed set of recognized permission tokens
    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    // ========================================
    // Enforcement path
    // ========================================

    /// Load the current persisted record for the request's principal.
    ///
    /// Mandatory on every gated request; the gate never trusts a previously
    /// attached snapshot. A missing identifier and an identifier that no
    /// longer resolves are distinct failures.
    async fn load_principal(&self, principal_id: Option<&str>) -> AccessResult<Principal> {
        let principal_id = principal_id.ok_or(AccessError::NotAuthenticated)?;

        self.principals
            .load(principal_id)
            .await?
            .ok_or_else(|| AccessError::principal_not_found(principal_id))
    }

    /// Compute the principal's effective permission set from current state
    pub fn resolve_effective(&self, principal: &Principal) -> AccessResult<EffectivePermissionSet> {
        let preset = self.presets.get(principal.role)?;
        Ok(resolver::resolve(&preset, &principal.overrides))
    }

    /// Coarse enforcement: the principal's role must equal `required`.
    ///
    /// Returns the freshly loaded principal on allow, so downstream logic
    /// never has to re-fetch it.
    pub async fn authorize_role(
        &self,
        principal_id: Option<&str>,
        required: Role,
    ) -> AccessResult<Principal> {
        let principal = self.load_principal(principal_id).await?;

        if principal.role != required {
            warn!(
                principal_id = %principal.id,
                role = %principal.role,
                required = %required,
                "Role gate denied request"
            );
            return Err(AccessError::forbidden(format!("role {}", required)));
        }

        debug!(principal_id = %principal.id, role = %required, "Role gate allowed request");
        Ok(principal)
    }

    /// Fine-grained enforcement: the effective permission set must be a
    /// superset of `required`.
    ///
    /// An empty requirement list allows immediately without loading the
    /// principal (the gate is a deliberate no-op for operations without
    /// fine-grained checks) and returns `None`. Otherwise the freshly loaded
    /// principal is returned on allow.
    pub async fn authorize_permissions(
        &self,
        principal_id: Option<&str>,
        required: &[Permission],
    ) -> AccessResult<Option<Principal>> {
        if required.is_empty() {
            return Ok(None);
        }

        let principal = self.load_principal(principal_id).await?;
        let effective = self.resolve_effective(&principal)?;

        let missing = effective.missing(required);
        if !missing.is_empty() {
            let tokens = missing
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            warn!(
                principal_id = %principal.id,
                missing = %tokens,
                "Capability gate denied request"
            );
            return Err(AccessError::forbidden(format!("permission {}", tokens)));
        }

        debug!(principal_id = %principal.id, "Capability gate allowed request");
        Ok(Some(principal))
    }

    // ========================================
    // Management path (gated at the HTTP layer)
    // ========================================

    /// Read the base permission set for a role
    pub fn read_preset(&self, role: Role) -> AccessResult<HashSet<Permission>> {
        Ok((*self.presets.get(role)?).clone())
    }

    /// A consistent view of every role preset
    pub fn list_presets(&self) -> HashMap<Role, HashSet<Permission>> {
        self.presets
            .snapshot()
            .iter()
            .map(|(role, permissions)| (*role, (**permissions).clone()))
            .collect()
    }

    /// Replace a role's preset atomically; rejects tokens outside the catalog
    pub fn write_preset(&self, role: Role, permissions: HashSet<Permission>) -> AccessResult<()> {
        self.presets.set(role, permissions)
    }

    /// Create a principal record the way account creation does: default
    /// role, empty overrides. A custom identifier may be supplied; the store
    /// rejects a taken identifier with `PrincipalExists`.
    pub async fn create_principal(&self, id: Option<String>) -> AccessResult<Principal> {
        let principal = match id {
            Some(id) => Principal::new(id, Role::default_for_new_principal()),
            None => Principal::new_account(),
        };

        self.principals.insert(principal.clone()).await?;
        Ok(principal)
    }

    /// Fetch the current persisted record for administrative inspection
    pub async fn get_principal(&self, principal_id: &str) -> AccessResult<Principal> {
        self.principals
            .load(principal_id)
            .await?
            .ok_or_else(|| AccessError::principal_not_found(principal_id))
    }

    /// Administrative role change
    pub async fn set_principal_role(&self, principal_id: &str, role: Role) -> AccessResult<()> {
        self.principals.set_role(principal_id, role).await
    }

    /// Administrative override replacement; the whole set is validated
    /// against the catalog and swapped atomically.
    pub async fn replace_principal_overrides(
        &self,
        principal_id: &str,
        overrides: HashSet<Permission>,
    ) -> AccessResult<()> {
        self.catalog.validate_all(&overrides)?;
        self.principals
            .replace_overrides(principal_id, overrides)
            .await
    }
}

impl std::fmt::Debug for AccessService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessService")
            .field("catalog", &self.catalog.all().len())
            .field("presets", &self.presets)
            .finish()
    }
}
