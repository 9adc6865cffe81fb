use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Report liveness and the active evaluator settings
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let config = state.route_evaluator.config();

    Json(json!({
        "status": "ok",
        "checks": {
            "evaluator": {
                "sample_points": config.sample_points,
                "point_concurrency": config.point_concurrency,
                "route_concurrency": config.route_concurrency,
                "fetch_timeout_ms": config.fetch_timeout.as_millis() as u64,
                "request_deadline_ms": config.request_deadline.as_millis() as u64,
                "least_traffic_policy": format!("{:?}", config.least_traffic_policy),
            }
        }
    }))
}
