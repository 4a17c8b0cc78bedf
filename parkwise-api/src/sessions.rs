use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use parkwise_core::models::{ExitReceipt, ParkReceipt, Session};
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParkVehicleRequest {
    pub owner_name: Option<String>,
    pub vehicle_number: String,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions", post(park_vehicle))
        .route("/v1/sessions/active", get(list_active))
        .route("/v1/sessions/recent", get(list_recent))
        .route("/v1/sessions/{vehicle_number}/exit", post(exit_vehicle))
}

/// POST /v1/sessions
async fn park_vehicle(
    State(state): State<AppState>,
    Json(req): Json<ParkVehicleRequest>,
) -> Result<(StatusCode, Json<ParkReceipt>), AppError> {
    let receipt = state
        .ledger
        .park_vehicle(req.owner_name.as_deref(), &req.vehicle_number)
        .await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

/// POST /v1/sessions/{vehicle_number}/exit
async fn exit_vehicle(
    State(state): State<AppState>,
    Path(vehicle_number): Path<String>,
) -> Result<Json<ExitReceipt>, AppError> {
    let receipt = state.ledger.exit_vehicle(&vehicle_number).await?;
    info!(
        "Vehicle {} left {} after {} min, charged {:.2}",
        receipt.vehicle_number, receipt.slot_label, receipt.minutes, receipt.amount
    );

    Ok(Json(receipt))
}

/// GET /v1/sessions/active
async fn list_active(State(state): State<AppState>) -> Result<Json<Vec<Session>>, AppError> {
    Ok(Json(state.ledger.list_active().await?))
}

/// GET /v1/sessions/recent?limit=N
async fn list_recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<Session>>, AppError> {
    let limit = query.limit.unwrap_or(state.recent_limit);
    Ok(Json(state.ledger.list_recent(limit).await?))
}
