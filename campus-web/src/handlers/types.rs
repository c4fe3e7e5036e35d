//! Type definitions for handlers
//!
//! This module contains all the request/response types used by the handlers.

use campus_access::{Permission, Principal};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use utoipa::ToSchema;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// Permission catalog listing
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogResponse {
    /// Every token the deployment recognizes, sorted
    #[schema(example = json!(["content:publish", "user:view"]))]
    pub permissions: Vec<String>,
}

/// One role preset
#[derive(Debug, Serialize, ToSchema)]
pub struct PresetResponse {
    #[schema(example = "editor")]
    pub role: String,
    #[schema(example = json!(["content:publish", "user:view"]))]
    pub permissions: Vec<String>,
}

impl PresetResponse {
    pub fn new(role: campus_access::Role, permissions: &HashSet<Permission>) -> Self {
        Self {
            role: role.to_string(),
            permissions: sorted_tokens(permissions),
        }
    }
}

/// All role presets
#[derive(Debug, Serialize, ToSchema)]
pub struct PresetListResponse {
    pub presets: Vec<PresetResponse>,
}

/// Replace a role preset
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePresetRequest {
    /// The complete new grant list for the role
    #[schema(example = json!(["content:publish", "user:view"]))]
    pub permissions: Vec<String>,
}

/// Create a principal record
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePrincipalRequest {
    /// Identifier for the new principal; generated when omitted
    #[schema(example = "erin")]
    pub id: Option<String>,
}

/// One principal record
#[derive(Debug, Serialize, ToSchema)]
pub struct PrincipalResponse {
    #[schema(example = "erin")]
    pub id: String,
    #[schema(example = "editor")]
    pub role: String,
    /// Per-principal grants on top of the role preset, sorted
    pub overrides: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Principal> for PrincipalResponse {
    fn from(principal: Principal) -> Self {
        Self {
            id: principal.id,
            role: principal.role.to_string(),
            overrides: sorted_tokens(&principal.overrides),
            created_at: principal.created_at,
        }
    }
}

/// Change a principal's role
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    #[schema(example = "editor")]
    pub role: String,
}

/// Replace a principal's permission overrides
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOverridesRequest {
    #[schema(example = json!(["billing:view"]))]
    pub permissions: Vec<String>,
}

/// Response for the gated demonstration operations
#[derive(Debug, Serialize, ToSchema)]
pub struct GatedActionResponse {
    #[schema(example = "published")]
    pub action: String,
    /// Identifier of the principal the gate admitted
    #[schema(example = "erin")]
    pub principal_id: String,
}

/// Content category listing
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryListResponse {
    pub categories: Vec<String>,
}

fn sorted_tokens(permissions: &HashSet<Permission>) -> Vec<String> {
    let mut tokens: Vec<String> = permissions.iter().map(|p| p.to_string()).collect();
    tokens.sort();
    tokens
}
