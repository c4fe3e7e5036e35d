//! OpenAPI specification for the Campus web server
//!
//! This module defines the complete OpenAPI specification for the Campus API.

use utoipa::OpenApi;

use crate::handlers::{
    CatalogResponse, CategoryListResponse, CreatePrincipalRequest, GatedActionResponse,
    HealthResponse, PresetListResponse, PresetResponse, PrincipalResponse,
    UpdateOverridesRequest, UpdatePresetRequest, UpdateRoleRequest,
};

/// Main OpenAPI specification for the Campus web server
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campus API",
        version = "0.1.0",
        description = "Role and permission based authorization service for the Campus platform",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Health endpoints
        crate::handlers::health_check,

        // Management endpoints
        crate::handlers::list_permissions,
        crate::handlers::list_presets,
        crate::handlers::get_preset,
        crate::handlers::update_preset,
        crate::handlers::create_principal,
        crate::handlers::get_principal,
        crate::handlers::update_principal_role,
        crate::handlers::update_principal_overrides,

        // Gated platform operations
        crate::handlers::publish_content,
        crate::handlers::list_categories,
        crate::handlers::view_users,
    ),
    components(
        schemas(
            HealthResponse,
            CatalogResponse,
            PresetResponse,
            PresetListResponse,
            UpdatePresetRequest,
            CreatePrincipalRequest,
            PrincipalResponse,
            UpdateRoleRequest,
            UpdateOverridesRequest,
            GatedActionResponse,
            CategoryListResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Admin", description = "Preset and principal management, administrator role required"),
        (name = "Content", description = "Content operations behind the capability gate"),
        (name = "Users", description = "User directory operations behind the capability gate"),
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn openapi_spec() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}
