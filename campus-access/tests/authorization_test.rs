//! End-to-end authorization behavior
//!
//! Drives the full decision path (catalog → presets → principal store →
//! resolver → gates) through the public API, the same way the web layer does.

use campus_access::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

fn perm(token: &str) -> Permission {
    Permission::parse(token).unwrap()
}

fn perms(tokens: &[&str]) -> HashSet<Permission> {
    tokens.iter().map(|t| perm(t)).collect()
}

/// A deployment with a post-centric catalog, matching the scenarios in the
/// product requirements.
fn post_platform() -> AccessConfig {
    let catalog =
        PermissionCatalog::from_tokens(["post:view", "post:edit", "post:delete"]).unwrap();
    AccessConfig {
        presets: HashMap::from([
            (Role::Administrator, catalog.all().clone()),
            (Role::Editor, perms(&["post:edit", "post:view"])),
            (Role::Viewer, perms(&["post:view"])),
            (Role::Support, perms(&["post:view"])),
        ]),
        catalog,
    }
}

async fn service(config: AccessConfig) -> (AccessService, Arc<MemoryPrincipalStore>) {
    let store = Arc::new(MemoryPrincipalStore::new());
    let service = AccessService::new(config, store.clone()).unwrap();
    (service, store)
}

#[tokio::test]
async fn editor_preset_grants_post_edit() {
    let (service, store) = service(post_platform()).await;
    store
        .insert(Principal::new("erin", Role::Editor))
        .await
        .unwrap();

    let principal = service
        .authorize_permissions(Some("erin"), &[perm("post:edit")])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(principal.id, "erin");
}

#[tokio::test]
async fn editor_denied_post_delete_with_token_named() {
    let (service, store) = service(post_platform()).await;
    store
        .insert(Principal::new("erin", Role::Editor))
        .await
        .unwrap();

    let err = service
        .authorize_permissions(Some("erin"), &[perm("post:edit"), perm("post:delete")])
        .await
        .unwrap_err();

    match err {
        AccessError::Forbidden { requirement } => {
            assert!(requirement.contains("post:delete"));
            assert!(!requirement.contains("post:edit"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn viewer_override_supplements_preset() {
    let (service, store) = service(post_platform()).await;
    let mut victor = Principal::new("victor", Role::Viewer);
    victor.overrides = perms(&["post:delete"]);
    store.insert(victor).await.unwrap();

    // the viewer preset alone would deny this
    let allowed = service
        .authorize_permissions(Some("victor"), &[perm("post:delete")])
        .await;
    assert!(allowed.is_ok());
}

#[tokio::test]
async fn mid_session_promotion_is_visible_on_next_request() {
    let (service, store) = service(post_platform()).await;
    store
        .insert(Principal::new("erin", Role::Editor))
        .await
        .unwrap();

    let denied = service
        .authorize_role(Some("erin"), Role::Administrator)
        .await;
    assert!(matches!(denied, Err(AccessError::Forbidden { .. })));

    service
        .set_principal_role("erin", Role::Administrator)
        .await
        .unwrap();

    // same session identifier, next request
    let allowed = service
        .authorize_role(Some("erin"), Role::Administrator)
        .await;
    assert!(allowed.is_ok());
}

#[tokio::test]
async fn revocation_takes_effect_on_next_request() {
    let (service, store) = service(post_platform()).await;
    let mut victor = Principal::new("victor", Role::Viewer);
    victor.overrides = perms(&["post:delete"]);
    store.insert(victor).await.unwrap();

    assert!(service
        .authorize_permissions(Some("victor"), &[perm("post:delete")])
        .await
        .is_ok());

    service
        .replace_principal_overrides("victor", HashSet::new())
        .await
        .unwrap();

    // no stale-allow window: the very next request reflects the revocation
    let denied = service
        .authorize_permissions(Some("victor"), &[perm("post:delete")])
        .await;
    assert!(matches!(denied, Err(AccessError::Forbidden { .. })));
}

#[tokio::test]
async fn preset_change_is_visible_without_touching_the_principal() {
    let (service, store) = service(post_platform()).await;
    store
        .insert(Principal::new("erin", Role::Editor))
        .await
        .unwrap();

    assert!(service
        .authorize_permissions(Some("erin"), &[perm("post:edit")])
        .await
        .is_ok());

    service
        .write_preset(Role::Editor, perms(&["post:view"]))
        .unwrap();

    let denied = service
        .authorize_permissions(Some("erin"), &[perm("post:edit")])
        .await;
    assert!(matches!(denied, Err(AccessError::Forbidden { .. })));
}

#[tokio::test]
async fn effective_set_is_a_superset_of_both_sources() {
    let (service, store) = service(post_platform()).await;
    let mut sam = Principal::new("sam", Role::Support);
    sam.overrides = perms(&["post:edit"]);
    store.insert(sam).await.unwrap();

    let principal = service.get_principal("sam").await.unwrap();
    let effective = service.resolve_effective(&principal).unwrap();

    for granted in service
        .read_preset(Role::Support)
        .unwrap()
        .iter()
        .chain(principal.overrides.iter())
    {
        assert!(effective.contains(granted), "lost grant {granted}");
    }
}

#[tokio::test]
async fn empty_requirement_allows_without_identifier_or_storage() {
    let (service, _) = service(post_platform()).await;
    // nothing in the store, no identifier attached: still allowed
    let decision = service.authorize_permissions(None, &[]).await.unwrap();
    assert!(decision.is_none());
}

#[tokio::test]
async fn missing_identifier_fails_both_gates_before_storage_io() {
    let (service, _) = service(post_platform()).await;

    let role = service.authorize_role(None, Role::Administrator).await;
    assert!(matches!(role, Err(AccessError::NotAuthenticated)));

    let capability = service
        .authorize_permissions(None, &[perm("post:view")])
        .await;
    assert!(matches!(capability, Err(AccessError::NotAuthenticated)));
}

#[tokio::test]
async fn preset_write_outside_catalog_fails_without_partial_apply() {
    let (service, _) = service(post_platform()).await;
    let before = service.read_preset(Role::Editor).unwrap();

    let result = service.write_preset(Role::Editor, perms(&["post:view", "post:publish"]));
    assert!(
        matches!(result, Err(AccessError::InvalidPermission { token }) if token == "post:publish")
    );
    assert_eq!(service.read_preset(Role::Editor).unwrap(), before);
}

#[tokio::test]
async fn decisions_are_deterministic_for_unchanged_state() {
    let (service, store) = service(post_platform()).await;
    store
        .insert(Principal::new("erin", Role::Editor))
        .await
        .unwrap();

    let required = [perm("post:edit"), perm("post:view")];
    for _ in 0..10 {
        assert!(service
            .authorize_permissions(Some("erin"), &required)
            .await
            .is_ok());
    }
}

#[tokio::test]
async fn default_deployment_administrator_holds_full_catalog() {
    let (service, store) = service(AccessConfig::default()).await;
    store
        .insert(Principal::new("root", Role::Administrator))
        .await
        .unwrap();

    let principal = service.get_principal("root").await.unwrap();
    let effective = service.resolve_effective(&principal).unwrap();
    for token in service.catalog().all() {
        assert!(effective.contains(token));
    }
}
