pub mod environment;
pub mod geocoding;
pub mod osrm;
pub mod route_evaluator;
pub mod tomtom;
pub mod waqi;

use crate::constants::HTTP_TOO_MANY_REQUESTS;
use crate::error::AppError;
use reqwest::StatusCode;

/// Rate limiting and 5xx responses are transient; anything else is reported
/// through the provider-specific variant.
pub(crate) fn classify_http_failure(
    provider: &str,
    status: StatusCode,
    body: String,
    permanent: fn(String) -> AppError,
) -> AppError {
    let message = format!("{} HTTP {}: {}", provider, status, body);
    if status.as_u16() == HTTP_TOO_MANY_REQUESTS || status.is_server_error() {
        AppError::UpstreamTransient(message)
    } else {
        permanent(message)
    }
}
