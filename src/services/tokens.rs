//! Issued bearer tokens (the Auth Gate's storage side)

use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::config::CONFIG;
use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::middleware::AuthContext;
use crate::models::prelude::*;
use crate::services::security::{generate_token, hash_token};

/// Persist a new token for `account_id` and return its plain text
pub async fn issue_token(db: &DbConn, account_id: i64, name: &str) -> Result<String> {
    let plain = generate_token();
    let now = Utc::now();
    purge_expired_tokens(db, now).await?;

    let token = personal_access_token::ActiveModel {
        account_id: Set(account_id),
        name: Set(name.to_string()),
        token_hash: Set(hash_token(&plain)),
        last_used_at: Set(None),
        expires_at: Set(CONFIG.auth.token_ttl_hours.map(|h| now + Duration::hours(h))),
        created_at: Set(now),
        ..Default::default()
    };
    token.insert(db).await?;

    Ok(plain)
}

/// Resolve a presented bearer token into the acting account
pub async fn authenticate(db: &DbConn, plain: &str) -> Result<AuthContext> {
    let found = PersonalAccessToken::find()
        .filter(personal_access_token::Column::TokenHash.eq(hash_token(plain)))
        .find_also_related(Account)
        .one(db)
        .await?;

    let (token, account) = match found {
        Some((token, Some(account))) => (token, account),
        _ => return Err(AppError::Unauthorized("Unauthenticated.".to_string())),
    };

    let now = Utc::now();
    if token.is_expired(now) {
        PersonalAccessToken::delete_by_id(token.id).exec(db).await?;
        return Err(AppError::Unauthorized("Token has expired.".to_string()));
    }
    if account.is_deleted() || !account.is_active() {
        return Err(AppError::Unauthorized(
            "Account is inactive or has been deleted.".to_string(),
        ));
    }

    let token_id = token.id;
    let mut active: personal_access_token::ActiveModel = token.into();
    active.last_used_at = Set(Some(now));
    active.update(db).await?;

    Ok(AuthContext { account, token_id })
}

/// Drop every token whose expiry has passed
pub async fn purge_expired_tokens<C: ConnectionTrait>(db: &C, now: DateTime<Utc>) -> Result<u64> {
    let result = PersonalAccessToken::delete_many()
        .filter(personal_access_token::Column::ExpiresAt.lte(now))
        .exec(db)
        .await?;
    if result.rows_affected > 0 {
        tracing::debug!(count = result.rows_affected, "Purged expired tokens");
    }
    Ok(result.rows_affected)
}

/// Delete exactly one token
pub async fn revoke_token(db: &DbConn, token_id: i64) -> Result<()> {
    let result = PersonalAccessToken::delete_by_id(token_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::Unauthorized(
            "No bearer token provided or token is invalid.".to_string(),
        ));
    }
    Ok(())
}

/// Delete every token belonging to an account
pub async fn revoke_all_tokens<C: ConnectionTrait>(db: &C, account_id: i64) -> Result<u64> {
    let result = PersonalAccessToken::delete_many()
        .filter(personal_access_token::Column::AccountId.eq(account_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
