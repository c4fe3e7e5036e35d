//! Route definitions for the Campus web server
//!
//! This module defines all the routes and attaches each gate to the routes
//! it protects. Capability declarations are made here, once, at router
//! construction; declaring a token outside the catalog makes construction
//! fail instead of producing a route that denies everyone.

use crate::{
    gates::{self, CapabilityGate},
    handlers, openapi, AppState, WebResult,
};
use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};

/// Create API routes
pub fn api_routes(state: AppState) -> WebResult<Router<AppState>> {
    let publish = CapabilityGate::declare(&state, &["content:publish"])?;
    let categories = CapabilityGate::declare(&state, &["content:categories"])?;
    let directory = CapabilityGate::declare(&state, &["user:view"])?;

    // Management subtree: one role gate in front of everything
    let admin = Router::new()
        .route("/permissions", get(handlers::list_permissions))
        .route("/presets", get(handlers::list_presets))
        .route(
            "/presets/{role}",
            get(handlers::get_preset).put(handlers::update_preset),
        )
        .route("/principals", post(handlers::create_principal))
        .route("/principals/{id}", get(handlers::get_principal))
        .route(
            "/principals/{id}/role",
            patch(handlers::update_principal_role),
        )
        .route(
            "/principals/{id}/permissions",
            put(handlers::update_principal_overrides),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            gates::require_administrator,
        ));

    Ok(Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // OpenAPI document
        .route("/openapi.json", get(openapi::openapi_spec))
        // Management
        .nest("/admin", admin)
        // Gated platform operations, one capability declaration per route
        .route(
            "/content/publish",
            post(handlers::publish_content).route_layer(middleware::from_fn_with_state(
                publish,
                gates::capability_gate,
            )),
        )
        .route(
            "/content/categories",
            get(handlers::list_categories).route_layer(middleware::from_fn_with_state(
                categories,
                gates::capability_gate,
            )),
        )
        .route(
            "/users",
            get(handlers::view_users).route_layer(middleware::from_fn_with_state(
                directory,
                gates::capability_gate,
            )),
        ))
}
