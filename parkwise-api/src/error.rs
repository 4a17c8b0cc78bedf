use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parkwise_core::ParkingError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<ParkingError> for AppError {
    fn from(err: ParkingError) -> Self {
        let message = err.to_string();
        match err {
            ParkingError::ValidationError(_) => AppError::ValidationError(message),
            ParkingError::NotFound(_) => AppError::NotFoundError(message),
            ParkingError::Conflict(_) | ParkingError::Full => AppError::ConflictError(message),
            ParkingError::Storage(_) => AppError::InternalServerError(message),
        }
    }
}
