use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Json, Router,
};

use crate::endpoints::extractors::ValidatedQuery;
use crate::error::Result;
use crate::middleware::{AdminOnly, Authorized, Staff};
use crate::models::account;
use crate::schemas::{AccountQuery, DataResponse, Page};
use crate::services::accounts;
use crate::state::AppState;

/// Create account administration routes
pub fn accounts_routes(state: AppState) -> Router {
    Router::new()
        .route("/get", get(list_accounts))
        .route("/get/{id}", get(get_account))
        .route("/delete/{id}", delete(delete_account))
        .route("/restore/{id}", put(restore_account))
        .with_state(state)
}

async fn list_accounts(
    State(state): State<AppState>,
    Authorized(ctx, _): Authorized<Staff>,
    ValidatedQuery(query): ValidatedQuery<AccountQuery>,
) -> Result<Json<Page<account::Model>>> {
    Ok(Json(accounts::list_accounts(&state.db, &ctx, query).await?))
}

async fn get_account(
    State(state): State<AppState>,
    Authorized(_, _): Authorized<Staff>,
    Path(id): Path<i64>,
) -> Result<Json<account::Model>> {
    Ok(Json(accounts::get_account(&state.db, id).await?))
}

async fn delete_account(
    State(state): State<AppState>,
    Authorized(ctx, _): Authorized<AdminOnly>,
    Path(id): Path<i64>,
) -> Result<Json<DataResponse<account::Model>>> {
    let account = accounts::soft_delete(&state.db, &ctx, id).await?;
    Ok(Json(DataResponse::new(
        "Account has been successfully deleted",
        account,
    )))
}

async fn restore_account(
    State(state): State<AppState>,
    Authorized(_, _): Authorized<AdminOnly>,
    Path(id): Path<i64>,
) -> Result<Json<DataResponse<account::Model>>> {
    let account = accounts::restore(&state.db, id).await?;
    Ok(Json(DataResponse::new(
        "Account has been successfully restored",
        account,
    )))
}
