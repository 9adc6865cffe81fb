use axum::Router;
use ecoroute::config::Config;
use ecoroute::services::environment::EnvironmentFetcher;
use ecoroute::services::geocoding::{Geocoder, OpenWeatherGeocoder};
use ecoroute::services::osrm::{OsrmClient, RoutingProvider};
use ecoroute::services::route_evaluator::RouteEvaluator;
use ecoroute::services::tomtom::{TomTomClient, TrafficSource};
use ecoroute::services::waqi::{AirQualitySource, WaqiClient};
use ecoroute::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ecoroute=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting EcoRoute API server");
    tracing::info!(
        sample_points = config.evaluator.sample_points,
        point_concurrency = config.evaluator.point_concurrency,
        route_concurrency = config.evaluator.route_concurrency,
        least_traffic_policy = ?config.evaluator.least_traffic_policy,
        "Configuration loaded successfully"
    );

    // Initialize external clients
    let geocoder: Arc<dyn Geocoder> = match config.openweather_base_url {
        Some(ref base_url) => Arc::new(OpenWeatherGeocoder::with_base_url(
            config.openweather_api_key.clone(),
            base_url.clone(),
        )),
        None => Arc::new(OpenWeatherGeocoder::new(config.openweather_api_key.clone())),
    };
    let routing: Arc<dyn RoutingProvider> = match config.osrm_base_url {
        Some(ref base_url) => Arc::new(OsrmClient::with_base_url(base_url.clone())),
        None => Arc::new(OsrmClient::new()),
    };
    let traffic: Arc<dyn TrafficSource> = match config.tomtom_base_url {
        Some(ref base_url) => Arc::new(TomTomClient::with_base_url(
            config.tomtom_api_key.clone(),
            base_url.clone(),
        )),
        None => Arc::new(TomTomClient::new(config.tomtom_api_key.clone())),
    };
    let air_quality: Arc<dyn AirQualitySource> = match config.waqi_base_url {
        Some(ref base_url) => Arc::new(WaqiClient::with_base_url(
            config.waqi_token.clone(),
            base_url.clone(),
        )),
        None => Arc::new(WaqiClient::new(config.waqi_token.clone())),
    };

    let environment = EnvironmentFetcher::new(traffic, air_quality, &config.evaluator);
    let route_evaluator = RouteEvaluator::new(environment, config.evaluator.clone())
        .map_err(|e| format!("Invalid evaluator configuration: {}", e))?;

    // Create application state
    let state = Arc::new(AppState {
        geocoder,
        routing,
        route_evaluator,
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", ecoroute::routes::create_router(state.clone()))
        .merge(ecoroute::routes::create_legacy_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
