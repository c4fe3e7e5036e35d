//! Principal records and the storage seam
//!
//! A principal is the persisted identity a request acts on behalf of: one
//! role plus an explicit set of override grants. The storage engine itself
//! lives outside this crate; `PrincipalStore` is the contract it fulfils.

use crate::{AccessError, AccessResult, Permission, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{hash_map::Entry, HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::debug;

/// Persisted principal record
///
/// Overrides are additive grants on top of the role preset. Created with the
/// default role and empty overrides at account creation; mutated only by
/// administrative operations, and override updates always replace the whole
/// set so concurrent admin edits cannot interleave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Unique principal identifier
    pub id: String,
    /// Coarse role classification
    pub role: Role,
    /// Explicit permission grants beyond the role preset
    pub overrides: HashSet<Permission>,
    /// Record creation time
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Principal {
    /// Create a record with the given role and no overrides
    pub fn new<S: Into<String>>(id: S, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            overrides: HashSet::new(),
            created_at: chrono::Utc::now(),
        }
    }

    /// Create a record the way account creation does: default role, no
    /// overrides, generated identifier.
    pub fn new_account() -> Self {
        Self::new(
            uuid::Uuid::new_v4().to_string(),
            Role::default_for_new_principal(),
        )
    }
}

/// Storage contract for principal records
///
/// Implementations must provide atomic reads (no torn records) and atomic
/// replace-writes for role and override updates.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// Fetch the current persisted record, or `None` if the id does not
    /// resolve. Side-effect-free; called on every gated request.
    async fn load(&self, principal_id: &str) -> AccessResult<Option<Principal>>;

    /// Insert a new record; fails with `PrincipalExists` if the identifier
    /// is already taken. Check and write happen atomically so concurrent
    /// creates cannot overwrite each other.
    async fn insert(&self, principal: Principal) -> AccessResult<()>;

    /// Replace the principal's role
    async fn set_role(&self, principal_id: &str, role: Role) -> AccessResult<()>;

    /// Replace the whole override set atomically
    async fn replace_overrides(
        &self,
        principal_id: &str,
        overrides: HashSet<Permission>,
    ) -> AccessResult<()>;
}

/// In-process principal store used by the server and tests
#[derive(Debug, Default)]
pub struct MemoryPrincipalStore {
    records: RwLock<HashMap<String, Principal>>,
}

impl MemoryPrincipalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PrincipalStore for MemoryPrincipalStore {
    async fn load(&self, principal_id: &str) -> AccessResult<Option<Principal>> {
        let records = self.records.read().await;
        Ok(records.get(principal_id).cloned())
    }

    async fn insert(&self, principal: Principal) -> AccessResult<()> {
        let mut records = self.records.write().await;
        match records.entry(principal.id.clone()) {
            Entry::Occupied(_) => Err(AccessError::PrincipalExists {
                principal_id: principal.id,
            }),
            Entry::Vacant(slot) => {
                debug!(principal_id = %principal.id, role = %principal.role, "Principal record created");
                slot.insert(principal);
                Ok(())
            }
        }
    }

    async fn set_role(&self, principal_id: &str, role: Role) -> AccessResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(principal_id)
            .ok_or_else(|| AccessError::principal_not_found(principal_id))?;
        record.role = role;
        debug!(principal_id = %principal_id, role = %role, "Principal role replaced");
        Ok(())
    }

    async fn replace_overrides(
        &self,
        principal_id: &str,
        overrides: HashSet<Permission>,
    ) -> AccessResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(principal_id)
            .ok_or_else(|| AccessError::principal_not_found(principal_id))?;
        record.overrides = overrides;
        debug!(principal_id = %principal_id, "Principal overrides replaced");
        Ok(())
    }
}
