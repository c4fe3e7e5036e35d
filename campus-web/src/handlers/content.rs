//! Gated platform operations
//!
//! Representative operations behind the capability gate. The handlers do no
//! authorization of their own; by the time one runs, the gate has already
//! loaded the principal and checked the route's declared permissions.

use super::types::{CategoryListResponse, GatedActionResponse};
use crate::gates::CurrentPrincipal;
use axum::response::Json;
use tracing::info;

/// Publish content
#[utoipa::path(
    post,
    path = "/api/content/publish",
    tag = "Content",
    summary = "Publish content",
    description = "Requires the content:publish permission",
    responses(
        (status = 200, description = "Content published", body = GatedActionResponse),
        (status = 401, description = "No principal or principal no longer exists"),
        (status = 403, description = "Effective permissions do not cover content:publish")
    )
)]
pub async fn publish_content(
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Json<GatedActionResponse> {
    info!(principal_id = %principal.id, "Publishing content");

    Json(GatedActionResponse {
        action: "published".to_string(),
        principal_id: principal.id,
    })
}

/// List content categories
#[utoipa::path(
    get,
    path = "/api/content/categories",
    tag = "Content",
    summary = "List content categories",
    description = "Requires the content:categories permission",
    responses(
        (status = 200, description = "Category listing", body = CategoryListResponse),
        (status = 401, description = "No principal or principal no longer exists"),
        (status = 403, description = "Effective permissions do not cover content:categories")
    )
)]
pub async fn list_categories(
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Json<CategoryListResponse> {
    info!(principal_id = %principal.id, "Listing content categories");

    Json(CategoryListResponse {
        categories: vec![
            "announcements".to_string(),
            "courses".to_string(),
            "resources".to_string(),
        ],
    })
}

/// View the user directory
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    summary = "View user directory",
    description = "Requires the user:view permission",
    responses(
        (status = 200, description = "Directory view recorded", body = GatedActionResponse),
        (status = 401, description = "No principal or principal no longer exists"),
        (status = 403, description = "Effective permissions do not cover user:view")
    )
)]
pub async fn view_users(
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Json<GatedActionResponse> {
    info!(principal_id = %principal.id, "Viewing user directory");

    Json(GatedActionResponse {
        action: "viewed".to_string(),
        principal_id: principal.id,
    })
}
