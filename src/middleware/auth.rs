//! Authentication middleware for protected routes
//!
//! Requires a valid `Authorization: Bearer <token>` header. The resolved
//! account travels to handlers as an [`AuthContext`] request extension.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::models::account::{self, AccountRole};
use crate::services::tokens;
use crate::state::AppState;

/// The acting account for one request, plus the token it presented
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub account: account::Model,
    pub token_id: i64,
}

impl AuthContext {
    pub fn account_id(&self) -> i64 {
        self.account.id
    }

    pub fn role(&self) -> AccountRole {
        self.account.user_role
    }

    pub fn is_admin(&self) -> bool {
        self.account.user_role == AccountRole::Admin
    }
}

/// Auth middleware that validates Bearer tokens
///
/// Returns 401 Unauthorized if the token is missing, unknown, expired,
/// or belongs to an inactive or deleted account.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = match extract_bearer_token(&req) {
        Some(t) => t,
        None => {
            return AppError::Unauthorized("Unauthenticated.".to_string()).into_response();
        }
    };

    let ctx = match tokens::authenticate(&state.db, &token).await {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::debug!(path = %req.uri().path(), "Rejected bearer token: {}", e);
            return e.into_response();
        }
    };

    req.extensions_mut().insert(ctx);
    next.run(req).await
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(req: &Request) -> Option<String> {
    let auth_header = req.headers().get(AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
