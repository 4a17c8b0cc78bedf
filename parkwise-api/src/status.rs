use axum::{extract::State, routing::get, Json, Router};
use parkwise_core::models::OccupancySummary;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/status", get(occupancy))
        .route("/health", get(|| async { "ok" }))
}

/// GET /v1/status
async fn occupancy(State(state): State<AppState>) -> Result<Json<OccupancySummary>, AppError> {
    let (total, available) = state.slots.counts().await?;
    let parked = state.ledger.count_active().await?;

    Ok(Json(OccupancySummary::new(total, available, parked)))
}
