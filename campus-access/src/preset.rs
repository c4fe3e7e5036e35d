//! Role Preset Store
//!
//! Maps each role to its base permission set. Reads vastly outnumber writes:
//! readers clone an `Arc` snapshot under a briefly-held lock, writers validate
//! against the catalog first and then swap in a fresh set, so a write in
//! flight never yields a torn preset and a failed write never partially
//! applies.

use crate::{AccessError, AccessResult, Permission, PermissionCatalog, Role};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use tracing::info;

/// The role presets the platform ships with. The administrator preset is the
/// full catalog: admin bypass is data, not a separate code path.
pub fn default_presets(catalog: &PermissionCatalog) -> HashMap<Role, HashSet<Permission>> {
    let tokens = |names: &[&str]| -> HashSet<Permission> {
        names
            .iter()
            .map(|t| Permission::parse(t).expect("default preset tokens are well-formed"))
            .collect()
    };

    HashMap::from([
        (Role::Administrator, catalog.all().clone()),
        (
            Role::Editor,
            tokens(&["user:view", "content:publish", "content:categories"]),
        ),
        (Role::Viewer, tokens(&["user:view"])),
        (
            Role::Support,
            tokens(&["user:view", "user:edit", "billing:view"]),
        ),
    ])
}

/// Concurrent role → permission-set store with atomic replace-writes
pub struct RolePresetStore {
    catalog: Arc<PermissionCatalog>,
    presets: RwLock<Arc<HashMap<Role, Arc<HashSet<Permission>>>>>,
}

impl RolePresetStore {
    /// Create a store seeded with the given presets, validating every token
    /// against the catalog.
    pub fn new(
        catalog: Arc<PermissionCatalog>,
        seed: HashMap<Role, HashSet<Permission>>,
    ) -> AccessResult<Self> {
        let mut presets = HashMap::with_capacity(seed.len());
        for (role, permissions) in seed {
            catalog.validate_all(&permissions)?;
            presets.insert(role, Arc::new(permissions));
        }

        Ok(Self {
            catalog,
            presets: RwLock::new(Arc::new(presets)),
        })
    }

    /// Get the base permission set for a role.
    ///
    /// Fails with `PresetNotFound` for a role with no registered preset; this
    /// should not occur with the seeded defaults, but the contract defines it
    /// rather than panicking.
    pub fn get(&self, role: Role) -> AccessResult<Arc<HashSet<Permission>>> {
        let snapshot = self.presets.read().unwrap();
        snapshot
            .get(&role)
            .cloned()
            .ok_or_else(|| AccessError::PresetNotFound {
                role: role.to_string(),
            })
    }

    /// Replace the whole preset for a role atomically.
    ///
    /// Validation happens before any state is touched: a preset containing a
    /// token outside the catalog is rejected with `InvalidPermission` and the
    /// previous preset stays in place.
    pub fn set(&self, role: Role, permissions: HashSet<Permission>) -> AccessResult<()> {
        self.catalog.validate_all(&permissions)?;

        let mut guard = self.presets.write().unwrap();
        let mut next = (**guard).clone();
        next.insert(role, Arc::new(permissions));
        *guard = Arc::new(next);

        info!(role = %role, "Role preset replaced");
        Ok(())
    }

    /// A consistent point-in-time view of every preset
    pub fn snapshot(&self) -> Arc<HashMap<Role, Arc<HashSet<Permission>>>> {
        self.presets.read().unwrap().clone()
    }
}

impl std::fmt::Debug for RolePresetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("RolePresetStore")
            .field("roles", &snapshot.len())
            .finish()
    }
}
