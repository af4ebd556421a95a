use axum::{
    Json,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::auth::scopes::{Scope, scopes_for};
use crate::services::IssuedToken;

// ============================================================================
// Request Types
// ============================================================================

/// Form body of the token endpoint. The optional `scope` field is accepted
/// for wire compatibility but ignored; grants come from the role flag.
#[derive(Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub scope: String,
}

// ============================================================================
// Resolved identity
// ============================================================================

/// The authenticated caller, resolved from the live user record on every
/// request. Scopes are recomputed here, never read back from token claims.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub is_superuser: bool,
    pub scopes: Vec<Scope>,
}

impl CurrentUser {
    #[must_use]
    pub fn has_scope(&self, scope: Scope) -> bool {
        self.scopes.contains(&scope)
    }
}

/// Authorization predicate shared by every scope-guarded handler.
///
/// A missing scope is a 403; it is distinct from the 401 the middleware
/// returns for a missing or invalid token.
pub fn require_scope(user: &CurrentUser, scope: Scope) -> Result<(), ApiError> {
    if user.has_scope(scope) {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "Missing required scope: {scope}"
        )))
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware for protected routes.
///
/// Verifies the `Authorization: Bearer` token, re-fetches the subject from
/// the store, rejects unknown or inactive accounts, and stashes the resolved
/// [`CurrentUser`] in request extensions for handlers.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    let claims = state.tokens.decode(&token)?;

    let user = state
        .store
        .get_user_by_username(&claims.sub)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to resolve user: {e}")))?
        .ok_or_else(|| ApiError::unauthorized("Could not validate credentials"))?;

    if !user.is_active {
        return Err(ApiError::unauthorized("Inactive user"));
    }

    tracing::Span::current().record("user_id", &user.username);

    let current = CurrentUser {
        id: user.id,
        username: user.username,
        is_superuser: user.is_superuser,
        scopes: scopes_for(user.is_superuser),
    };
    request.extensions_mut().insert(current);

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get("Authorization")?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /token
///
/// Exchange form-encoded credentials for a bearer token. Failures are a
/// uniform 401 regardless of whether the username exists.
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    axum::Form(payload): axum::Form<TokenRequest>,
) -> Result<Json<IssuedToken>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let issued = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(issued))
}
