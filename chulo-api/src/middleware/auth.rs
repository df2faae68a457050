use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    http::StatusCode,
};
use chulo_core::{ApprovalStatus, Capability, Principal, Role};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims issued by the identity provider for restaurant staff accounts
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StaffClaims {
    pub sub: String,
    pub email: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub approval: ApprovalStatus,
    pub exp: usize,
}

impl StaffClaims {
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.sub.clone(),
            email: self.email.clone(),
            role: self.role,
            approval: self.approval,
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

pub async fn pricing_auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    authorize(&state, req, next, Capability::RequestPricingAdvice).await
}

pub async fn catalog_auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    authorize(&state, req, next, Capability::ViewCatalog).await
}

async fn authorize(
    state: &AppState,
    mut req: Request,
    next: Next,
    capability: Capability,
) -> Result<Response, StatusCode> {
    if !state.auth.enabled {
        return Ok(next.run(req).await);
    }

    // 1. Extract token from Authorization header
    let token = req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // 2. Decode and validate JWT
    let token_data = decode::<StaffClaims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    ).map_err(|_| StatusCode::UNAUTHORIZED)?;

    // 3. Check role and approval
    let principal = token_data.claims.principal();
    if let Err(e) = principal.authorize(capability) {
        tracing::info!(user = %principal.user_id, "Access denied: {}", e);
        return Err(StatusCode::FORBIDDEN);
    }

    // 4. Inject principal for handlers
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
