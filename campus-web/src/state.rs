//! Application state for the Campus web server

use crate::{WebConfig, WebResult};
use campus_access::{
    AccessConfig, AccessService, MemoryPrincipalStore, Principal, PrincipalStore, Role,
};
use std::sync::Arc;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: WebConfig,
    /// Authorization decision service
    pub access: Arc<AccessService>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Seeds one administrator principal so the management endpoints are
    /// reachable on a fresh deployment; everything else is created through
    /// them.
    pub async fn new(config: WebConfig) -> WebResult<Self> {
        let principals = Arc::new(MemoryPrincipalStore::new());

        principals
            .insert(Principal::new(
                config.bootstrap_admin.clone(),
                Role::Administrator,
            ))
            .await?;
        info!(
            principal_id = %config.bootstrap_admin,
            "Created bootstrap administrator principal"
        );

        let access = AccessService::new(AccessConfig::default(), principals)?;

        Ok(Self {
            config,
            access: Arc::new(access),
        })
    }
}
