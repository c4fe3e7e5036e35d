//! Request gating
//!
//! The principal-context middleware attaches the request's principal
//! identifier (produced by the upstream authentication step), and the two
//! gates enforce in front of protected routes:
//!
//! - [`require_administrator`] — coarse role gate for the admin subtree
//! - [`capability_gate`] with a [`CapabilityGate`] declaration — fine-grained
//!   permission gate, registered per route at router construction
//!
//! On allow, a gate publishes the freshly loaded [`Principal`] into the
//! request extensions, overwriting anything already there; handlers pick it
//! up through [`CurrentPrincipal`] and never re-fetch.

use crate::{AppState, WebResult};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use campus_access::{AccessError, AccessService, Permission, Principal, Role};
use std::sync::Arc;
use tracing::debug;

/// Principal identifier attached to the request by the authentication step.
///
/// The `x-principal-id` header stands in for that step here; swapping it for
/// a token-verifying middleware changes nothing below this type.
#[derive(Debug, Clone)]
pub struct PrincipalId(pub String);

impl PrincipalId {
    fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get("x-principal-id")
            .and_then(|value| value.to_str().ok())
            .filter(|id| !id.is_empty())
            .map(|id| Self(id.to_string()))
    }
}

/// Attach the principal identifier (if any) to the request extensions
pub async fn principal_context_middleware(mut request: Request, next: Next) -> Response {
    if let Some(principal_id) = PrincipalId::from_headers(request.headers()) {
        request.extensions_mut().insert(principal_id);
    }
    next.run(request).await
}

/// HTTP mapping for authorization denials
///
/// `NotAuthenticated` and `PrincipalNotFound` both map to 401 but keep
/// distinct `error` kinds so clients can decide between re-authentication
/// and an access-denied page.
#[derive(Debug)]
pub struct AccessRejection(pub AccessError);

impl From<AccessError> for AccessRejection {
    fn from(err: AccessError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AccessRejection {
    fn into_response(self) -> Response {
        let message = self.0.to_string();
        let (status, body) = match &self.0 {
            AccessError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({
                    "error": "not_authenticated",
                    "message": message,
                }),
            ),
            AccessError::PrincipalNotFound { principal_id } => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({
                    "error": "principal_not_found",
                    "message": message,
                    "principal_id": principal_id,
                }),
            ),
            AccessError::PrincipalExists { principal_id } => (
                StatusCode::CONFLICT,
                serde_json::json!({
                    "error": "principal_exists",
                    "message": message,
                    "principal_id": principal_id,
                }),
            ),
            AccessError::Forbidden { requirement } => (
                StatusCode::FORBIDDEN,
                serde_json::json!({
                    "error": "forbidden",
                    "message": message,
                    "requirement": requirement,
                }),
            ),
            AccessError::InvalidPermission { token } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!({
                    "error": "invalid_permission",
                    "message": message,
                    "token": token,
                }),
            ),
            AccessError::PresetNotFound { role } => (
                StatusCode::NOT_FOUND,
                serde_json::json!({
                    "error": "preset_not_found",
                    "message": message,
                    "role": role,
                }),
            ),
            AccessError::UnknownRole { role } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!({
                    "error": "unknown_role",
                    "message": message,
                    "role": role,
                }),
            ),
            AccessError::Storage { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "error": "storage_error",
                    "message": message,
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

fn attached_principal_id(request: &Request) -> Option<String> {
    request
        .extensions()
        .get::<PrincipalId>()
        .map(|id| id.0.clone())
}

/// Role gate: the principal must currently hold the administrator role.
///
/// Always re-fetches the principal and overwrites any stale principal
/// context — this gate is the authoritative source of truth for the rest of
/// the request lifecycle.
pub async fn require_administrator(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AccessRejection> {
    let principal_id = attached_principal_id(&request);
    let principal = state
        .access
        .authorize_role(principal_id.as_deref(), Role::Administrator)
        .await?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Statically attached capability declaration for a protected route
///
/// Declared once at router construction; declarations are validated against
/// the catalog there, so a typo'd token fails the boot instead of silently
/// denying every request.
#[derive(Clone)]
pub struct CapabilityGate {
    access: Arc<AccessService>,
    required: Arc<Vec<Permission>>,
}

impl CapabilityGate {
    /// Declare the permissions a route requires
    pub fn declare(state: &AppState, tokens: &[&str]) -> WebResult<Self> {
        let required = tokens
            .iter()
            .map(|token| Permission::parse(token))
            .collect::<Result<Vec<_>, _>>()?;
        state.access.catalog().validate_all(&required)?;

        debug!(required = ?tokens, "Registered capability gate");
        Ok(Self {
            access: state.access.clone(),
            required: Arc::new(required),
        })
    }

    /// The declared requirement list
    pub fn required(&self) -> &[Permission] {
        &self.required
    }
}

/// Capability gate middleware: the principal's effective permission set must
/// cover the route's declaration. An empty declaration passes through
/// without loading any principal.
pub async fn capability_gate(
    State(gate): State<CapabilityGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, AccessRejection> {
    let principal_id = attached_principal_id(&request);
    let principal = gate
        .access
        .authorize_permissions(principal_id.as_deref(), &gate.required)
        .await?;

    if let Some(principal) = principal {
        request.extensions_mut().insert(principal);
    }
    Ok(next.run(request).await)
}

/// Extractor handing gated handlers the principal the gate published
pub struct CurrentPrincipal(pub Principal);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = AccessRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or(AccessRejection(AccessError::NotAuthenticated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WebConfig;
    use axum::http::HeaderValue;

    #[test]
    fn test_principal_id_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-principal-id", HeaderValue::from_static("alice"));

        let id = PrincipalId::from_headers(&headers).unwrap();
        assert_eq!(id.0, "alice");
    }

    #[test]
    fn test_principal_id_absent_or_empty() {
        assert!(PrincipalId::from_headers(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert("x-principal-id", HeaderValue::from_static(""));
        assert!(PrincipalId::from_headers(&headers).is_none());
    }

    #[tokio::test]
    async fn test_declare_rejects_token_outside_catalog() {
        let state = AppState::new(WebConfig::default()).await.unwrap();

        let result = CapabilityGate::declare(&state, &["content:publish", "post:delete"]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_declare_accepts_catalog_tokens() {
        let state = AppState::new(WebConfig::default()).await.unwrap();

        let gate = CapabilityGate::declare(&state, &["content:publish"]).unwrap();
        assert_eq!(gate.required().len(), 1);
    }

    #[test]
    fn test_rejection_status_codes() {
        let forbidden = AccessRejection(AccessError::forbidden("role administrator"));
        assert_eq!(
            forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );

        let unauthenticated = AccessRejection(AccessError::NotAuthenticated);
        assert_eq!(
            unauthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );

        let stale = AccessRejection(AccessError::principal_not_found("ghost"));
        assert_eq!(stale.into_response().status(), StatusCode::UNAUTHORIZED);

        let invalid = AccessRejection(AccessError::invalid_permission("post:delete"));
        assert_eq!(
            invalid.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
