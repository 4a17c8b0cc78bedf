use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod payments;
pub mod sessions;
pub mod slots;
pub mod state;
pub mod status;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // The operator front end is served from a separate local origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .merge(slots::routes())
        .merge(sessions::routes())
        .merge(payments::routes())
        .merge(status::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
