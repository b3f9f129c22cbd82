pub mod accounts;
pub mod activity_logs;
pub mod auth;
pub mod books;
pub mod dashboard;
pub mod extractors;
pub mod minigames;

use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tower_http::services::ServeDir;

use crate::config::CONFIG;
use crate::middleware::require_auth;
use crate::schemas::{BatchOutcome, DataResponse};
use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/version", get(get_version))
        .nest_service("/storage", ServeDir::new(state.storage.root()))
        .merge(auth::public_auth_routes(state.clone()));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .merge(auth::auth_routes(state.clone()))
        .nest("/accounts", accounts::accounts_routes(state.clone()))
        .nest("/books", books::books_routes(state.clone()))
        .nest("/minigames", minigames::minigames_routes(state.clone()))
        .nest("/dashboard", dashboard::dashboard_routes(state.clone()))
        .nest(
            "/activity-logs",
            activity_logs::activity_logs_routes(state.clone()),
        )
        .layer(axum_middleware::from_fn_with_state(state, require_auth));

    public_routes.merge(protected_routes)
}

/// Render a batch content update: 200 when every item applied, 403 listing
/// the refused items next to the applied ones otherwise
pub(crate) fn batch_response<T: Serialize>(outcome: BatchOutcome<T>, message: &str) -> Response {
    if outcome.is_complete() {
        return Json(DataResponse::new(message, outcome.updated)).into_response();
    }

    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "message": "Operation partially completed: Some contents could not be updated due to insufficient permissions",
            "errors": outcome.errors,
            "updated": outcome.updated,
        })),
    )
        .into_response()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Version info endpoint
async fn get_version() -> Json<serde_json::Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": CONFIG.version,
    }))
}
