use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;

use crate::endpoints::extractors::ValidatedQuery;
use crate::error::Result;
use crate::middleware::{Authorized, Staff};
use crate::schemas::{DashboardQuery, DashboardResponse};
use crate::services::dashboard::{self, DashboardFilter};
use crate::state::AppState;

pub fn dashboard_routes(state: AppState) -> Router {
    Router::new()
        .route("/get", get(get_dashboard))
        .with_state(state)
}

async fn get_dashboard(
    State(state): State<AppState>,
    Authorized(_, _): Authorized<Staff>,
    ValidatedQuery(query): ValidatedQuery<DashboardQuery>,
) -> Result<Json<DashboardResponse>> {
    let filter = DashboardFilter::from_query(&query)?;
    Ok(Json(
        dashboard::get_dashboard(&state.db, filter, Utc::now()).await?,
    ))
}
