use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("No routes found: {0}")]
    NoRoutesFound(String),

    #[error("Routing API error: {0}")]
    RoutingApi(String),

    #[error("Geocoding API error: {0}")]
    GeocodingApi(String),

    #[error("Traffic API error: {0}")]
    TrafficApi(String),

    #[error("Air quality API error: {0}")]
    AirQualityApi(String),

    /// Network failure, rate limiting or a 5xx from a provider. Safe to retry.
    #[error("Upstream temporarily unavailable: {0}")]
    UpstreamTransient(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::UpstreamTransient(_))
    }

    /// Machine-readable classification returned alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::LocationNotFound(_) => "location_not_found",
            AppError::NoRoutesFound(_) => "no_routes",
            AppError::RoutingApi(_)
            | AppError::GeocodingApi(_)
            | AppError::TrafficApi(_)
            | AppError::AirQualityApi(_)
            | AppError::UpstreamTransient(_) => "upstream_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, error_message) = match self {
            AppError::InvalidRequest(ref e) => (StatusCode::BAD_REQUEST, e.as_str()),
            AppError::LocationNotFound(ref e) => {
                tracing::info!("Location not found: {}", e);
                (StatusCode::BAD_REQUEST, e.as_str())
            }
            AppError::NoRoutesFound(ref e) => {
                tracing::warn!("No routes found: {}", e);
                (StatusCode::BAD_GATEWAY, e.as_str())
            }
            AppError::RoutingApi(ref e) => {
                tracing::error!("Routing API error: {}", e);
                (StatusCode::BAD_GATEWAY, "Routing service error")
            }
            AppError::GeocodingApi(ref e) => {
                tracing::error!("Geocoding API error: {}", e);
                (StatusCode::BAD_GATEWAY, "Geocoding service error")
            }
            AppError::TrafficApi(ref e)
            | AppError::AirQualityApi(ref e)
            | AppError::UpstreamTransient(ref e) => {
                tracing::error!("Upstream error reached the request boundary: {}", e);
                (StatusCode::BAD_GATEWAY, "Upstream service error")
            }
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "code": code,
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
