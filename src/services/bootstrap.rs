use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::db::DbConn;
use crate::error::Result;
use crate::models::account::{AccountRole, AccountStatus};
use crate::models::prelude::*;
use crate::services::accounts::normalize_email;
use crate::services::security::hash_password;

/// Create the first administrator when none exists under `email`
///
/// Returns the created account, or `None` when the email is already taken.
pub async fn ensure_admin_account(
    db: &DbConn,
    email: &str,
    password: &str,
) -> Result<Option<account::Model>> {
    let email = normalize_email(email);

    let existing = Account::find()
        .filter(account::Column::Email.eq(email.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        tracing::debug!(email = %email, "Bootstrap admin already present");
        return Ok(None);
    }

    let now = Utc::now();
    let admin = account::ActiveModel {
        teacher_id: Set(None),
        email: Set(email),
        password: Set(hash_password(password)?),
        first_name: Set("System".to_string()),
        middle_name: Set(None),
        last_name: Set("Administrator".to_string()),
        user_role: Set(AccountRole::Admin),
        status: Set(AccountStatus::Active),
        deleted_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let admin = admin.insert(db).await?;

    tracing::info!(account_id = admin.id, "Created bootstrap administrator");
    Ok(Some(admin))
}
