use axum::{extract::State, routing::get, Json, Router};
use parkwise_core::models::Slot;
use parkwise_core::{validation, ParkingError, ParkingResult};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

/// Accepts both `12` and `"12"`, since operators type the total into a text field.
/// Any other JSON value is kept so it can be rejected as a validation error.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SlotTotal {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl SlotTotal {
    fn resolve(&self) -> ParkingResult<i64> {
        match self {
            SlotTotal::Number(total) => validation::slot_total(*total),
            SlotTotal::Text(raw) => validation::parse_slot_total(raw),
            SlotTotal::Other(value) => Err(ParkingError::ValidationError(format!(
                "Enter a valid positive number, got {}",
                value
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProvisionSlotsRequest {
    #[serde(default = "missing_total")]
    pub total: SlotTotal,
}

fn missing_total() -> SlotTotal {
    SlotTotal::Other(serde_json::Value::Null)
}

#[derive(Debug, Serialize)]
pub struct ProvisionSlotsResponse {
    pub total_slots: i64,
}

#[derive(Debug, Serialize)]
pub struct SlotStatusResponse {
    pub slots: Vec<Slot>,
    pub total_slots: i64,
    pub occupied: i64,
    pub available: i64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/slots", get(list_slots).post(provision_slots))
}

/// POST /v1/slots
async fn provision_slots(
    State(state): State<AppState>,
    Json(req): Json<ProvisionSlotsRequest>,
) -> Result<Json<ProvisionSlotsResponse>, AppError> {
    let total = req.total.resolve()?;
    let total_slots = state.slots.provision_slots(total).await?;

    Ok(Json(ProvisionSlotsResponse { total_slots }))
}

/// GET /v1/slots
async fn list_slots(State(state): State<AppState>) -> Result<Json<SlotStatusResponse>, AppError> {
    let slots = state.slots.list_slots().await?;
    let total_slots = slots.len() as i64;
    let occupied = slots.iter().filter(|slot| slot.occupied).count() as i64;

    Ok(Json(SlotStatusResponse {
        slots,
        total_slots,
        occupied,
        available: total_slots - occupied,
    }))
}
