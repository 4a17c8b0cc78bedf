use axum::{extract::State, routing::get, Json, Router};
use parkwise_core::models::Payment;
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PaymentsResponse {
    pub payments: Vec<Payment>,
    pub total_revenue: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/payments", get(list_payments))
}

/// GET /v1/payments
async fn list_payments(State(state): State<AppState>) -> Result<Json<PaymentsResponse>, AppError> {
    let payments = state.journal.list_all().await?;
    let total_revenue = state.journal.total_revenue().await?;

    Ok(Json(PaymentsResponse {
        payments,
        total_revenue,
    }))
}
