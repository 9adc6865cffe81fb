// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

// App state for sharing across the application
use services::geocoding::Geocoder;
use services::osrm::RoutingProvider;
use services::route_evaluator::RouteEvaluator;
use std::sync::Arc;

pub struct AppState {
    pub geocoder: Arc<dyn Geocoder>,
    pub routing: Arc<dyn RoutingProvider>,
    pub route_evaluator: RouteEvaluator,
}
