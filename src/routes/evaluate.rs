use crate::error::{AppError, Result};
use crate::models::route::EvaluateRouteRequest;
use crate::services::route_evaluator::SelectionResult;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// POST /routes/evaluate
/// Resolve both places, fetch alternatives, and return the five best-of routes
pub async fn evaluate_routes(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<EvaluateRouteRequest>, JsonRejection>,
) -> Result<Response> {
    let result = run_evaluation(&state, payload).await?;
    Ok(Json(result.to_response()).into_response())
}

/// POST /data
/// Same evaluation, answered in the shape the original web client reads
pub async fn evaluate_routes_legacy(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<EvaluateRouteRequest>, JsonRejection>,
) -> Result<Response> {
    let result = run_evaluation(&state, payload).await?;
    Ok(Json(result.to_legacy_response()).into_response())
}

async fn run_evaluation(
    state: &AppState,
    payload: std::result::Result<Json<EvaluateRouteRequest>, JsonRejection>,
) -> Result<SelectionResult> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(status = %rejection.status(), "Rejected request body: {}", rejection.body_text());
        AppError::InvalidRequest(rejection.body_text())
    })?;

    // Validate request before any upstream call
    request.validate().map_err(AppError::InvalidRequest)?;
    let trip = request
        .trip_parameters()
        .map_err(AppError::InvalidRequest)?;

    tracing::info!(
        start = %request.starting_point,
        destination = %request.final_destination,
        fuel_type = %trip.fuel_type,
        fuel_efficiency = trip.fuel_efficiency,
        load_weight = trip.load_weight,
        "Route evaluation request: {} -> {}",
        request.starting_point, request.final_destination
    );

    let (start, end) = tokio::join!(
        state.geocoder.locate(&request.starting_point),
        state.geocoder.locate(&request.final_destination),
    );
    let start = start.map_err(|e| name_endpoint(e, "starting point", &request.starting_point))?;
    let end = end.map_err(|e| name_endpoint(e, "final destination", &request.final_destination))?;

    let candidates = state.routing.candidate_routes(&start, &end).await?;

    state.route_evaluator.evaluate(candidates, &trip).await
}

fn name_endpoint(error: AppError, endpoint: &str, place: &str) -> AppError {
    match error {
        AppError::LocationNotFound(_) => {
            AppError::LocationNotFound(format!("Invalid {}: '{}'", endpoint, place))
        }
        other => other,
    }
}
