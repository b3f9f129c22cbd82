use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::middleware::AuthContext;
use crate::models::account::{AccountRole, AccountStatus};
use crate::models::prelude::*;
use crate::schemas::{
    AccountQuery, ChangePasswordRequest, LoginRequest, Page, PageRequest, RegisterRequest,
    UpdateAccountRequest, UpdateInformationRequest, DEFAULT_PER_PAGE,
};
use crate::services::security::{hash_password, verify_password};
use crate::services::tokens;

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check credentials and issue a bearer token
///
/// The order of checks is significant: unknown email (404), deleted (403),
/// wrong password (401), inactive (401).
pub async fn login(db: &DbConn, req: &LoginRequest) -> Result<(account::Model, String)> {
    let email = normalize_email(&req.email);

    let account = Account::find()
        .filter(account::Column::Email.eq(email.as_str()))
        .one(db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(
                "The email address you entered is not associated with any account.".to_string(),
            )
        })?;

    if account.is_deleted() {
        return Err(AppError::Forbidden(
            "This account has been deleted. Please contact the administrator.".to_string(),
        ));
    }

    if !verify_password(&req.password, &account.password) {
        tracing::warn!(account_id = account.id, "Login rejected: bad password");
        return Err(AppError::Unauthorized(
            "The provided credentials are incorrect.".to_string(),
        ));
    }

    if !account.is_active() {
        tracing::warn!(account_id = account.id, "Login rejected: inactive account");
        return Err(AppError::Unauthorized(
            "Your account is currently inactive. Please contact the administrator for assistance."
                .to_string(),
        ));
    }

    let token = tokens::issue_token(db, account.id, &account.email).await?;
    tracing::info!(account_id = account.id, role = %account.user_role, "Account logged in");

    Ok((account, token))
}

/// Invalidate exactly the token used for this request
pub async fn logout(db: &DbConn, ctx: &AuthContext) -> Result<()> {
    tokens::revoke_token(db, ctx.token_id).await
}

pub async fn change_password(
    db: &DbConn,
    ctx: &AuthContext,
    req: &ChangePasswordRequest,
) -> Result<()> {
    if !verify_password(&req.current_password, &ctx.account.password) {
        return Err(AppError::Unauthorized(
            "The current password is incorrect.".to_string(),
        ));
    }

    let mut active: account::ActiveModel = ctx.account.clone().into();
    active.password = Set(hash_password(&req.new_password)?);
    active.updated_at = Set(Utc::now());
    active.update(db).await?;

    Ok(())
}

/// Fail with a 422 on `email` if another account already uses it
pub async fn ensure_email_available<C: ConnectionTrait>(
    db: &C,
    email: &str,
    except_id: Option<i64>,
) -> Result<()> {
    let mut select = Account::find().filter(account::Column::Email.eq(email));
    if let Some(id) = except_id {
        select = select.filter(account::Column::Id.ne(id));
    }

    if select.count(db).await? > 0 {
        return Err(AppError::invalid("email", "The email has already been taken."));
    }
    Ok(())
}

async fn ensure_teacher_exists(db: &DbConn, teacher_id: i64) -> Result<()> {
    let teacher = Account::find_by_id(teacher_id)
        .filter(account::Column::UserRole.eq(AccountRole::Teacher))
        .filter(account::Column::DeletedAt.is_null())
        .one(db)
        .await?;

    if teacher.is_none() {
        return Err(AppError::invalid(
            "teacher_id",
            "The selected teacher id is invalid.",
        ));
    }
    Ok(())
}

/// Create an account on behalf of staff
///
/// Admins may create any role. Teachers may only enrol students, who are
/// attached to the creating teacher.
pub async fn register(
    db: &DbConn,
    ctx: &AuthContext,
    req: RegisterRequest,
) -> Result<account::Model> {
    let teacher_id = match ctx.role() {
        AccountRole::Admin => req.teacher_id,
        AccountRole::Teacher => {
            if req.user_role != AccountRole::Student {
                return Err(AppError::Forbidden(
                    "Teachers can only register student accounts.".to_string(),
                ));
            }
            Some(ctx.account_id())
        }
        AccountRole::Student => {
            return Err(AppError::Forbidden(
                "Access denied: Insufficient permissions".to_string(),
            ));
        }
    };

    let email = normalize_email(&req.email);
    ensure_email_available(db, &email, None).await?;

    if ctx.is_admin() {
        if let Some(id) = teacher_id {
            ensure_teacher_exists(db, id).await?;
        }
    }

    let now = Utc::now();
    let account = account::ActiveModel {
        teacher_id: Set(teacher_id),
        email: Set(email),
        password: Set(hash_password(&req.password)?),
        first_name: Set(req.first_name),
        middle_name: Set(req.middle_name.filter(|m| !m.trim().is_empty())),
        last_name: Set(req.last_name),
        user_role: Set(req.user_role),
        status: Set(req.status.unwrap_or(AccountStatus::Active)),
        deleted_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let account = account.insert(db).await?;

    tracing::info!(
        account_id = account.id,
        role = %account.user_role,
        created_by = ctx.account_id(),
        "Account registered"
    );
    Ok(account)
}

/// Self-service update of the acting account
pub async fn update_information(
    db: &DbConn,
    ctx: &AuthContext,
    req: UpdateInformationRequest,
) -> Result<account::Model> {
    if let Some(role) = req.user_role {
        if role != ctx.role() && !ctx.is_admin() {
            return Err(AppError::Forbidden(
                "Only administrators can change account roles.".to_string(),
            ));
        }
    }

    let email = normalize_email(&req.email);
    ensure_email_available(db, &email, Some(ctx.account_id())).await?;

    let mut active: account::ActiveModel = ctx.account.clone().into();
    active.email = Set(email);
    active.first_name = Set(req.first_name);
    active.middle_name = Set(req.middle_name.filter(|m| !m.trim().is_empty()));
    active.last_name = Set(req.last_name);
    if let Some(role) = req.user_role {
        active.user_role = Set(role);
    }
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}

/// Admin update of any account
pub async fn update_information_by_id(
    db: &DbConn,
    id: i64,
    req: UpdateAccountRequest,
) -> Result<account::Model> {
    let account = get_account(db, id).await?;

    let email = normalize_email(&req.email);
    ensure_email_available(db, &email, Some(id)).await?;

    if let Some(teacher_id) = req.teacher_id {
        if teacher_id == id {
            return Err(AppError::invalid(
                "teacher_id",
                "An account cannot be its own teacher.",
            ));
        }
        ensure_teacher_exists(db, teacher_id).await?;
    }

    let mut active: account::ActiveModel = account.into();
    active.email = Set(email);
    active.first_name = Set(req.first_name);
    active.middle_name = Set(req.middle_name.filter(|m| !m.trim().is_empty()));
    active.last_name = Set(req.last_name);
    active.user_role = Set(req.user_role);
    active.teacher_id = Set(req.teacher_id);
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}

pub async fn change_status(db: &DbConn, id: i64, status: AccountStatus) -> Result<account::Model> {
    let account = get_account(db, id).await?;

    let mut active: account::ActiveModel = account.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now());
    let account = active.update(db).await?;

    tracing::info!(account_id = id, status = ?status, "Account status changed");
    Ok(account)
}

/// Direct lookup; soft-deleted accounts are included
pub async fn get_account(db: &DbConn, id: i64) -> Result<account::Model> {
    Account::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".to_string()))
}

impl AccountQuery {
    /// Filter criteria for a listing requested by `acting_id`
    pub fn condition(&self, acting_id: i64) -> Condition {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Condition::any()
                    .add(account::Column::FirstName.contains(s))
                    .add(account::Column::MiddleName.contains(s))
                    .add(account::Column::LastName.contains(s))
            });

        let deleted = if self.is_deleted.unwrap_or(false) {
            account::Column::DeletedAt.is_not_null()
        } else {
            account::Column::DeletedAt.is_null()
        };

        Condition::all()
            .add(deleted)
            .add_option(search)
            .add_option(self.status.map(|s| account::Column::Status.eq(s)))
            .add_option(self.user_role.map(|r| account::Column::UserRole.eq(r)))
            .add_option(self.exclude_user_role.map(|r| account::Column::UserRole.ne(r)))
            .add_option(
                self.exclude_self
                    .unwrap_or(true)
                    .then(|| account::Column::Id.ne(acting_id)),
            )
    }
}

/// Filtered listing sorted by name, ten per page
pub async fn list_accounts(
    db: &DbConn,
    ctx: &AuthContext,
    query: AccountQuery,
) -> Result<Page<account::Model>> {
    let paging = PageRequest::new(query.page, None, DEFAULT_PER_PAGE);

    let select = Account::find().filter(query.condition(ctx.account_id()));
    let total = select.clone().count(db).await?;

    let accounts = select
        .order_by_asc(account::Column::FirstName)
        .order_by_asc(account::Column::MiddleName)
        .order_by_asc(account::Column::LastName)
        .order_by_asc(account::Column::Id)
        .offset(paging.offset())
        .limit(paging.per_page)
        .all(db)
        .await?;

    Ok(Page::new(accounts, paging.page, paging.per_page, total))
}

/// Soft-delete an account and revoke its tokens
pub async fn soft_delete(db: &DbConn, ctx: &AuthContext, id: i64) -> Result<account::Model> {
    if id == ctx.account_id() {
        return Err(AppError::Forbidden(
            "You cannot delete your own account.".to_string(),
        ));
    }

    let account = get_account(db, id).await?;
    if account.is_deleted() {
        return Err(AppError::Conflict("Account is already deleted.".to_string()));
    }

    let txn = db.begin().await?;

    let now = Utc::now();
    let mut active: account::ActiveModel = account.into();
    active.deleted_at = Set(Some(now));
    active.updated_at = Set(now);
    let account = active.update(&txn).await?;

    let revoked = tokens::revoke_all_tokens(&txn, id).await?;

    txn.commit().await?;

    tracing::info!(account_id = id, revoked, deleted_by = ctx.account_id(), "Account deleted");
    Ok(account)
}

pub async fn restore(db: &DbConn, id: i64) -> Result<account::Model> {
    let account = get_account(db, id).await?;
    if !account.is_deleted() {
        return Err(AppError::Conflict("Account is not deleted.".to_string()));
    }

    let mut active: account::ActiveModel = account.into();
    active.deleted_at = Set(None);
    active.updated_at = Set(Utc::now());
    let account = active.update(db).await?;

    tracing::info!(account_id = id, "Account restored");
    Ok(account)
}
