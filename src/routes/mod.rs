pub mod debug;
pub mod evaluate;

use axum::{routing::{get, post}, Router};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/routes/evaluate", post(evaluate::evaluate_routes))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}

/// Path and response shape used by the existing web client
pub fn create_legacy_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/data", post(evaluate::evaluate_routes_legacy))
        .with_state(state)
}
