use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::endpoints::extractors::{ValidatedJson, ValidatedQuery};
use crate::error::Result;
use crate::middleware::{Authenticated, Authorized, Staff};
use crate::models::activity_log;
use crate::schemas::{ActivityLogEntry, ActivityLogQuery, CreateActivityLog, DataResponse, Page};
use crate::services::activity_log as logs;
use crate::state::AppState;

/// Create activity log routes
pub fn activity_logs_routes(state: AppState) -> Router {
    Router::new()
        .route("/create", post(create_log))
        .route("/get", get(get_logs))
        .with_state(state)
}

async fn create_log(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    ValidatedJson(req): ValidatedJson<CreateActivityLog>,
) -> Result<(StatusCode, Json<DataResponse<activity_log::Model>>)> {
    let log = logs::create_log(&state.db, &ctx, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new("Activity log created successfully", log)),
    ))
}

async fn get_logs(
    State(state): State<AppState>,
    Authorized(_, _): Authorized<Staff>,
    ValidatedQuery(query): ValidatedQuery<ActivityLogQuery>,
) -> Result<Json<Page<ActivityLogEntry>>> {
    Ok(Json(logs::get_logs(&state.db, query).await?))
}
