use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use crate::endpoints::extractors::ValidatedJson;
use crate::error::Result;
use crate::middleware::{AdminOnly, Authenticated, Authorized, Staff};
use crate::models::account;
use crate::models::activity_log::MODULE_AUTH;
use crate::schemas::{
    ChangePasswordRequest, ChangeStatusRequest, CurrentUserResponse, DataResponse, LoginRequest,
    LoginResponse, MessageResponse, RegisterRequest, UpdateAccountRequest,
    UpdateInformationRequest,
};
use crate::services::accounts;
use crate::state::AppState;

/// Routes reachable without a token
pub fn public_auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .with_state(state)
}

/// Account self-service and administration under `/auth`
pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/get", get(get_current_user))
        .route("/auth/register", post(register))
        .route("/auth/change-password", post(change_password))
        .route("/auth/update-information", put(update_information))
        .route("/auth/update-information/{id}", put(update_information_by_id))
        .route("/auth/change-status/{id}", put(change_status))
        .with_state(state)
}

async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (account, token) = accounts::login(&state.db, &req).await?;

    state
        .activity
        .record_quietly(account.id, "Logged in", MODULE_AUTH)
        .await;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        role: account.user_role,
        token,
    }))
}

async fn logout(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
) -> Result<Json<MessageResponse>> {
    accounts::logout(&state.db, &ctx).await?;

    state
        .activity
        .record_quietly(ctx.account_id(), "Logged out", MODULE_AUTH)
        .await;

    Ok(Json(MessageResponse::new("Logout successful")))
}

async fn get_current_user(Authenticated(ctx): Authenticated) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse { user: ctx.account })
}

async fn register(
    State(state): State<AppState>,
    Authorized(ctx, _): Authorized<Staff>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<DataResponse<account::Model>>)> {
    let account = accounts::register(&state.db, &ctx, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new("Account has been successfully created", account)),
    ))
}

async fn change_password(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    accounts::change_password(&state.db, &ctx, &req).await?;
    Ok(Json(MessageResponse::new("Password has been successfully changed")))
}

async fn update_information(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    ValidatedJson(req): ValidatedJson<UpdateInformationRequest>,
) -> Result<Json<DataResponse<account::Model>>> {
    let account = accounts::update_information(&state.db, &ctx, req).await?;
    Ok(Json(DataResponse::new(
        "Account information has been successfully updated",
        account,
    )))
}

async fn update_information_by_id(
    State(state): State<AppState>,
    Authorized(_, _): Authorized<AdminOnly>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateAccountRequest>,
) -> Result<Json<DataResponse<account::Model>>> {
    let account = accounts::update_information_by_id(&state.db, id, req).await?;
    Ok(Json(DataResponse::new(
        "Account information has been successfully updated",
        account,
    )))
}

async fn change_status(
    State(state): State<AppState>,
    Authorized(_, _): Authorized<AdminOnly>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<ChangeStatusRequest>,
) -> Result<Json<DataResponse<account::Model>>> {
    let account = accounts::change_status(&state.db, id, req.status).await?;
    Ok(Json(DataResponse::new(
        "Account status has been successfully updated",
        account,
    )))
}
