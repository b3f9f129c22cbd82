//! Role-based authorization extractors
//!
//! Usage in handlers:
//! ```ignore
//! use crate::middleware::{Authorized, Staff};
//!
//! async fn create_book(
//!     Authorized(ctx, ..): Authorized<Staff>,
//!     State(state): State<AppState>,
//! ) -> Result<Json<book::Model>> {
//!     // Role already verified
//! }
//! ```

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::middleware::AuthContext;
use crate::models::account::AccountRole;

/// Trait for role requirement marker types
pub trait RoleRequirement: Send + Sync + 'static {
    /// Human readable name used in denial messages
    const NAME: &'static str;

    fn allows(role: AccountRole) -> bool;
}

/// Creates zero-sized marker types that implement `RoleRequirement`
macro_rules! define_roles {
    ($($(#[$meta:meta])* $name:ident => $label:literal [$($role:ident),+]),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl RoleRequirement for $name {
                const NAME: &'static str = $label;

                fn allows(role: AccountRole) -> bool {
                    matches!(role, $(AccountRole::$role)|+)
                }
            }
        )*
    };
}

define_roles! {
    /// Administrators only
    AdminOnly => "admin" [Admin],
    /// Administrators and teachers
    Staff => "staff" [Admin, Teacher],
}

fn auth_context(parts: &Parts) -> Result<AuthContext, AppError> {
    parts
        .extensions
        .get::<AuthContext>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("Unauthenticated.".to_string()))
}

/// Extractor that requires the acting account to hold a role
///
/// Answers 403 when the role does not satisfy `R`.
#[derive(Debug, Clone)]
pub struct Authorized<R: RoleRequirement>(pub AuthContext, pub PhantomData<R>);

impl<S, R> FromRequestParts<S> for Authorized<R>
where
    S: Send + Sync,
    R: RoleRequirement,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = auth_context(parts)?;

        if !R::allows(ctx.role()) {
            tracing::warn!(
                account_id = ctx.account_id(),
                role = %ctx.role(),
                required = R::NAME,
                "Role check failed"
            );
            return Err(AppError::Forbidden(
                "Access denied: Insufficient permissions".to_string(),
            ));
        }

        Ok(Authorized(ctx, PhantomData))
    }
}

/// Extractor for any authenticated account
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthContext);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Authenticated(auth_context(parts)?))
    }
}
