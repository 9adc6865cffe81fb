use async_trait::async_trait;
use ecoroute::config::EvaluatorConfig;
use ecoroute::error::{AppError, Result};
use ecoroute::models::{
    AirQualityReading, CandidateRoute, Coordinates, FuelType, TrafficReading, TripParameters,
};
use ecoroute::services::environment::EnvironmentFetcher;
use ecoroute::services::geocoding::Geocoder;
use ecoroute::services::osrm::RoutingProvider;
use ecoroute::services::route_evaluator::RouteEvaluator;
use ecoroute::services::tomtom::TrafficSource;
use ecoroute::services::waqi::AirQualitySource;
use std::sync::Arc;
use std::time::Duration;

/// Traffic provider answering from a closure
pub struct TrafficFn<F>(pub F);

#[async_trait]
impl<F> TrafficSource for TrafficFn<F>
where
    F: Fn(&Coordinates) -> Result<TrafficReading> + Send + Sync,
{
    async fn traffic_at(&self, point: &Coordinates) -> Result<TrafficReading> {
        (self.0)(point)
    }
}

/// Air-quality provider answering from a closure
pub struct AirQualityFn<F>(pub F);

#[async_trait]
impl<F> AirQualitySource for AirQualityFn<F>
where
    F: Fn(&Coordinates) -> Result<AirQualityReading> + Send + Sync,
{
    async fn air_quality_at(&self, point: &Coordinates) -> Result<AirQualityReading> {
        (self.0)(point)
    }
}

#[allow(dead_code)]
pub fn traffic_down() -> TrafficFn<impl Fn(&Coordinates) -> Result<TrafficReading> + Send + Sync> {
    TrafficFn(|_: &Coordinates| Err(AppError::TrafficApi("HTTP 403: bad key".to_string())))
}

#[allow(dead_code)]
pub fn air_quality_down(
) -> AirQualityFn<impl Fn(&Coordinates) -> Result<AirQualityReading> + Send + Sync> {
    AirQualityFn(|_: &Coordinates| {
        Err(AppError::AirQualityApi("Provider status 'error'".to_string()))
    })
}

#[allow(dead_code)]
pub struct StubGeocoder {
    pub places: Vec<(&'static str, Coordinates)>,
    pub unavailable: bool,
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn locate(&self, place: &str) -> Result<Coordinates> {
        if self.unavailable {
            return Err(AppError::GeocodingApi("HTTP 503".to_string()));
        }
        self.places
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(place))
            .map(|(_, coords)| *coords)
            .ok_or_else(|| AppError::LocationNotFound(format!("Could not resolve '{}'", place)))
    }
}

#[allow(dead_code)]
pub fn delhi_and_agra() -> StubGeocoder {
    StubGeocoder {
        places: vec![
            ("Delhi", Coordinates::new(28.6139, 77.2090).unwrap()),
            ("Agra", Coordinates::new(27.1767, 78.0081).unwrap()),
        ],
        unavailable: false,
    }
}

#[allow(dead_code)]
pub struct StubRouting {
    pub routes: Vec<CandidateRoute>,
}

#[async_trait]
impl RoutingProvider for StubRouting {
    async fn candidate_routes(
        &self,
        _start: &Coordinates,
        _end: &Coordinates,
    ) -> Result<Vec<CandidateRoute>> {
        if self.routes.is_empty() {
            return Err(AppError::NoRoutesFound(
                "Routing provider returned no routes".to_string(),
            ));
        }
        Ok(self.routes.clone())
    }
}

#[allow(dead_code)]
/// Evaluator settings that keep tests fast
pub fn test_config() -> EvaluatorConfig {
    EvaluatorConfig {
        fetch_timeout: Duration::from_millis(500),
        request_deadline: Duration::from_secs(2),
        fetch_max_retries: 0,
        retry_backoff: Duration::from_millis(1),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn evaluator_with(
    traffic: impl TrafficSource + 'static,
    air_quality: impl AirQualitySource + 'static,
    config: EvaluatorConfig,
) -> RouteEvaluator {
    let environment = EnvironmentFetcher::new(Arc::new(traffic), Arc::new(air_quality), &config);
    RouteEvaluator::new(environment, config).unwrap()
}

#[allow(dead_code)]
/// A north-bound polyline at longitude `lng` with `points` positions
pub fn line_route(lng: f64, points: usize, distance: f64, duration: f64) -> CandidateRoute {
    let geometry = (0..points)
        .map(|i| [lng, 27.0 + i as f64 * 0.01])
        .collect();
    CandidateRoute::new(geometry, distance, duration).unwrap()
}

#[allow(dead_code)]
pub fn diesel_trip(load_weight: f64, fuel_efficiency: f64) -> TripParameters {
    TripParameters::new(load_weight, FuelType::Diesel, fuel_efficiency).unwrap()
}
