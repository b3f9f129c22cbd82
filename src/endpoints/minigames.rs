use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::Utc;

use crate::endpoints::batch_response;
use crate::endpoints::extractors::{ValidatedJson, ValidatedQuery};
use crate::error::Result;
use crate::middleware::{Authenticated, Authorized, Staff};
use crate::models::{minigame, minigame_content, minigame_history};
use crate::schemas::{
    DataResponse, HistoryEntry, MessageResponse, MinigameDetail, MinigameListItem,
    MinigamePayload, MinigameQuery, Page, StoreHistoryRequest, StoreMinigameContents,
    UpdateMinigameContents,
};
use crate::services::minigames;
use crate::state::AppState;

/// Create minigame routes
pub fn minigames_routes(state: AppState) -> Router {
    Router::new()
        .route("/get", get(list_minigames))
        .route("/get/{id}", get(get_minigame))
        .route("/create", post(create_minigame))
        .route("/update/{id}", put(update_minigame))
        .route("/delete/{id}", delete(delete_minigame))
        .route("/copy/{id}", post(copy_minigame))
        .route("/contents/create/{minigame_id}", post(store_contents))
        .route("/contents/update", put(update_contents))
        .route("/contents/delete/{content_id}", delete(delete_content))
        .route("/contents/{minigame_id}", get(get_contents))
        .route("/history/create", post(store_history))
        .route("/history/{minigame_id}", get(get_history))
        .route("/history/{minigame_id}/{student_id}", get(get_student_history))
        .with_state(state)
}

async fn list_minigames(
    State(state): State<AppState>,
    Authenticated(_): Authenticated,
    ValidatedQuery(query): ValidatedQuery<MinigameQuery>,
) -> Result<Json<Page<MinigameListItem>>> {
    Ok(Json(
        minigames::list_minigames(&state.db, query, Utc::now()).await?,
    ))
}

async fn get_minigame(
    State(state): State<AppState>,
    Authenticated(_): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<MinigameDetail>> {
    Ok(Json(minigames::get_minigame(&state.db, id).await?))
}

async fn create_minigame(
    State(state): State<AppState>,
    Authorized(ctx, _): Authorized<Staff>,
    ValidatedJson(payload): ValidatedJson<MinigamePayload>,
) -> Result<(StatusCode, Json<DataResponse<minigame::Model>>)> {
    let minigame = minigames::create_minigame(&state.db, &ctx, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new("Minigame created successfully", minigame)),
    ))
}

async fn update_minigame(
    State(state): State<AppState>,
    Authorized(ctx, _): Authorized<Staff>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<MinigamePayload>,
) -> Result<Json<DataResponse<minigame::Model>>> {
    let minigame = minigames::update_minigame(&state.db, &ctx, id, payload).await?;
    Ok(Json(DataResponse::new("Minigame updated successfully", minigame)))
}

async fn delete_minigame(
    State(state): State<AppState>,
    Authorized(ctx, _): Authorized<Staff>,
    Path(id): Path<i64>,
) -> Result<Json<DataResponse<minigame::Model>>> {
    let minigame = minigames::delete_minigame(&state.db, &ctx, id).await?;
    Ok(Json(DataResponse::new("Minigame deleted successfully", minigame)))
}

async fn copy_minigame(
    State(state): State<AppState>,
    Authorized(ctx, _): Authorized<Staff>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<DataResponse<MinigameDetail>>)> {
    let copy = minigames::copy_minigame(&state.db, &ctx, id).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new("Minigame copied successfully", copy)),
    ))
}

async fn store_contents(
    State(state): State<AppState>,
    Authorized(ctx, _): Authorized<Staff>,
    Path(minigame_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<StoreMinigameContents>,
) -> Result<(StatusCode, Json<DataResponse<Vec<minigame_content::Model>>>)> {
    let contents = minigames::store_contents(&state.db, &ctx, minigame_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(
            "Minigame contents created successfully",
            contents,
        )),
    ))
}

async fn update_contents(
    State(state): State<AppState>,
    Authorized(ctx, _): Authorized<Staff>,
    ValidatedJson(req): ValidatedJson<UpdateMinigameContents>,
) -> Result<Response> {
    let outcome = minigames::update_contents(&state.db, &ctx, req).await?;
    Ok(batch_response(
        outcome,
        "Minigame contents updated successfully",
    ))
}

async fn delete_content(
    State(state): State<AppState>,
    Authorized(ctx, _): Authorized<Staff>,
    Path(content_id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    minigames::delete_content(&state.db, &ctx, content_id).await?;
    Ok(Json(MessageResponse::new(
        "Minigame content deleted successfully",
    )))
}

async fn get_contents(
    State(state): State<AppState>,
    Authenticated(_): Authenticated,
    Path(minigame_id): Path<i64>,
) -> Result<Json<Vec<minigame_content::Model>>> {
    Ok(Json(minigames::get_contents(&state.db, minigame_id).await?))
}

async fn store_history(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    ValidatedJson(req): ValidatedJson<StoreHistoryRequest>,
) -> Result<(StatusCode, Json<DataResponse<minigame_history::Model>>)> {
    let history = minigames::store_history(&state.db, &ctx, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new("History created successfully", history)),
    ))
}

async fn get_history(
    State(state): State<AppState>,
    Authenticated(_): Authenticated,
    Path(minigame_id): Path<i64>,
) -> Result<Json<Vec<HistoryEntry>>> {
    Ok(Json(
        minigames::get_history(&state.db, minigame_id, None).await?,
    ))
}

async fn get_student_history(
    State(state): State<AppState>,
    Authenticated(_): Authenticated,
    Path((minigame_id, student_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<HistoryEntry>>> {
    Ok(Json(
        minigames::get_history(&state.db, minigame_id, Some(student_id)).await?,
    ))
}
