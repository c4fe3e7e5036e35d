//! Administrative management handlers
//!
//! Everything here sits behind the administrator role gate; the handlers
//! themselves only translate between HTTP and [`AccessService`] management
//! calls.

use super::types::{
    CatalogResponse, CreatePrincipalRequest, PresetListResponse, PresetResponse,
    PrincipalResponse, UpdateOverridesRequest, UpdatePresetRequest, UpdateRoleRequest,
};
use crate::{gates::AccessRejection, AppState};
use axum::{
    extract::{Path, State},
    response::Json,
    Json as JsonExtractor,
};
use campus_access::{Permission, Role};
use std::collections::HashSet;
use tracing::info;

fn parse_role(raw: &str) -> Result<Role, AccessRejection> {
    raw.parse::<Role>().map_err(AccessRejection)
}

/// Parse a grant list from the wire; tokens are validated against the
/// catalog by the management call that consumes them.
fn parse_permissions(
    tokens: &[String],
) -> Result<HashSet<Permission>, AccessRejection> {
    tokens
        .iter()
        .map(|token| Permission::parse(token))
        .collect::<Result<HashSet<_>, _>>()
        .map_err(AccessRejection)
}

/// List the permission catalog
#[utoipa::path(
    get,
    path = "/api/admin/permissions",
    tag = "Admin",
    summary = "List permission catalog",
    description = "List every permission token this deployment recognizes",
    responses(
        (status = 200, description = "Catalog listing", body = CatalogResponse),
        (status = 401, description = "No principal or principal no longer exists"),
        (status = 403, description = "Principal is not an administrator")
    )
)]
pub async fn list_permissions(State(state): State<AppState>) -> Json<CatalogResponse> {
    let mut permissions: Vec<String> = state.access
        .catalog()
        .all()
        .iter()
        .map(|p| p.to_string())
        .collect();
    permissions.sort();

    Json(CatalogResponse { permissions })
}

/// List all role presets
#[utoipa::path(
    get,
    path = "/api/admin/presets",
    tag = "Admin",
    summary = "List role presets",
    description = "List the base permission preset of every role",
    responses(
        (status = 200, description = "Preset listing", body = PresetListResponse),
        (status = 401, description = "No principal or principal no longer exists"),
        (status = 403, description = "Principal is not an administrator")
    )
)]
pub async fn list_presets(State(state): State<AppState>) -> Json<PresetListResponse> {
    let mut presets: Vec<PresetResponse> = state.access
        .list_presets()
        .iter()
        .map(|(role, permissions)| PresetResponse::new(*role, permissions))
        .collect();
    presets.sort_by(|a, b| a.role.cmp(&b.role));

    Json(PresetListResponse { presets })
}

/// Get one role preset
#[utoipa::path(
    get,
    path = "/api/admin/presets/{role}",
    tag = "Admin",
    summary = "Get role preset",
    params(
        ("role" = String, Path, description = "Role name")
    ),
    responses(
        (status = 200, description = "The role's preset", body = PresetResponse),
        (status = 404, description = "Role has no registered preset"),
        (status = 422, description = "Unknown role name")
    )
)]
pub async fn get_preset(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> Result<Json<PresetResponse>, AccessRejection> {
    let role = parse_role(&role)?;
    let permissions = state.access.read_preset(role)?;

    Ok(Json(PresetResponse::new(role, &permissions)))
}

/// Replace one role preset
#[utoipa::path(
    put,
    path = "/api/admin/presets/{role}",
    tag = "Admin",
    summary = "Replace role preset",
    description = "Replace the role's base grant list. Rejected as a whole if any token is outside the catalog.",
    params(
        ("role" = String, Path, description = "Role name")
    ),
    request_body = UpdatePresetRequest,
    responses(
        (status = 200, description = "The updated preset", body = PresetResponse),
        (status = 422, description = "Unknown role name or permission token")
    )
)]
pub async fn update_preset(
    State(state): State<AppState>,
    Path(role): Path<String>,
    JsonExtractor(request): JsonExtractor<UpdatePresetRequest>,
) -> Result<Json<PresetResponse>, AccessRejection> {
    let role = parse_role(&role)?;
    let permissions = parse_permissions(&request.permissions)?;

    state.access.write_preset(role, permissions)?;
    info!(%role, "Replaced role preset");

    let permissions = state.access.read_preset(role)?;
    Ok(Json(PresetResponse::new(role, &permissions)))
}

/// Create a principal record
#[utoipa::path(
    post,
    path = "/api/admin/principals",
    tag = "Admin",
    summary = "Create principal",
    description = "Create a principal with the default role and no overrides",
    request_body = CreatePrincipalRequest,
    responses(
        (status = 200, description = "The created principal", body = PrincipalResponse),
        (status = 409, description = "Identifier already taken")
    )
)]
pub async fn create_principal(
    State(state): State<AppState>,
    JsonExtractor(request): JsonExtractor<CreatePrincipalRequest>,
) -> Result<Json<PrincipalResponse>, AccessRejection> {
    let principal = state.access.create_principal(request.id).await?;
    info!(principal_id = %principal.id, "Created principal");

    Ok(Json(principal.into()))
}

/// Get one principal record
#[utoipa::path(
    get,
    path = "/api/admin/principals/{id}",
    tag = "Admin",
    summary = "Get principal",
    params(
        ("id" = String, Path, description = "Principal identifier")
    ),
    responses(
        (status = 200, description = "The principal record", body = PrincipalResponse),
        (status = 401, description = "Identifier does not resolve")
    )
)]
pub async fn get_principal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PrincipalResponse>, AccessRejection> {
    let principal = state.access.get_principal(&id).await?;
    Ok(Json(principal.into()))
}

/// Change a principal's role
#[utoipa::path(
    patch,
    path = "/api/admin/principals/{id}/role",
    tag = "Admin",
    summary = "Change principal role",
    description = "Assign a different role. Takes effect on the principal's next request.",
    params(
        ("id" = String, Path, description = "Principal identifier")
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "The updated principal", body = PrincipalResponse),
        (status = 401, description = "Identifier does not resolve"),
        (status = 422, description = "Unknown role name")
    )
)]
pub async fn update_principal_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonExtractor(request): JsonExtractor<UpdateRoleRequest>,
) -> Result<Json<PrincipalResponse>, AccessRejection> {
    let role = parse_role(&request.role)?;

    state.access.set_principal_role(&id, role).await?;
    info!(principal_id = %id, %role, "Changed principal role");

    let principal = state.access.get_principal(&id).await?;
    Ok(Json(principal.into()))
}

/// Replace a principal's permission overrides
#[utoipa::path(
    put,
    path = "/api/admin/principals/{id}/permissions",
    tag = "Admin",
    summary = "Replace principal overrides",
    description = "Replace the per-principal grant list. Rejected as a whole if any token is outside the catalog. Takes effect on the principal's next request.",
    params(
        ("id" = String, Path, description = "Principal identifier")
    ),
    request_body = UpdateOverridesRequest,
    responses(
        (status = 200, description = "The updated principal", body = PrincipalResponse),
        (status = 401, description = "Identifier does not resolve"),
        (status = 422, description = "Unknown permission token")
    )
)]
pub async fn update_principal_overrides(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonExtractor(request): JsonExtractor<UpdateOverridesRequest>,
) -> Result<Json<PrincipalResponse>, AccessRejection> {
    let overrides = parse_permissions(&request.permissions)?;

    state.access
        .replace_principal_overrides(&id, overrides)
        .await?;
    info!(principal_id = %id, "Replaced principal overrides");

    let principal = state.access.get_principal(&id).await?;
    Ok(Json(principal.into()))
}
