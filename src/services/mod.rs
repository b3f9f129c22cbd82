pub mod accounts;
pub mod activity_log;
pub mod books;
pub mod bootstrap;
pub mod dashboard;
pub mod minigames;
pub mod security;
pub mod storage;
pub mod tokens;

pub use activity_log::ActivityLogService;
pub use security::*;
pub use storage::PdfStorage;

use crate::error::{AppError, Result};
use crate::middleware::AuthContext;

/// Writes to books, minigames and their contents are limited to the owner
pub fn ensure_owner(ctx: &AuthContext, owner_id: i64, resource: &str) -> Result<()> {
    if owner_id != ctx.account_id() {
        tracing::warn!(
            account_id = ctx.account_id(),
            owner_id,
            resource,
            "Ownership check failed"
        );
        return Err(AppError::Forbidden(
            "Access denied: Insufficient permissions".to_string(),
        ));
    }
    Ok(())
}
