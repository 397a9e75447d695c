//! Platform statistics endpoint.

use axum::{Json, Router, extract::State, routing::get};
use notehub_common::AppResult;
use notehub_core::StatsSummary;

use crate::middleware::AppState;

/// The six-counter summary, recomputed per request.
async fn summary(State(state): State<AppState>) -> AppResult<Json<StatsSummary>> {
    let stats = state.stats_service.summary().await?;
    Ok(Json(stats))
}

/// Create the stats router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(summary))
}
