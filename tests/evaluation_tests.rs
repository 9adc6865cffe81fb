use async_trait::async_trait;
use ecoroute::config::LeastTrafficPolicy;
use ecoroute::error::{AppError, Result};
use ecoroute::models::{AirQualityReading, Coordinates, TrafficReading};
use ecoroute::services::environment::EnvironmentFetcher;
use ecoroute::services::route_evaluator::RouteEvaluator;
use ecoroute::services::tomtom::TrafficSource;
use ecoroute::services::waqi::AirQualitySource;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

mod common;

use common::{AirQualityFn, TrafficFn};

#[tokio::test]
async fn test_single_route_with_no_readings() {
    let evaluator = common::evaluator_with(
        common::traffic_down(),
        common::air_quality_down(),
        common::test_config(),
    );
    let route = common::line_route(77.2, 2, 10_000.0, 600.0);

    let result = evaluator
        .evaluate(vec![route], &common::diesel_trip(0.0, 10.0))
        .await
        .unwrap();

    let only = &result.routes()[0];
    assert!((only.total_carbon - 260.0).abs() < 1e-9);
    assert!((only.score - (-3610.0)).abs() < 1e-9);
    assert!(only
        .details
        .iter()
        .all(|p| p.traffic.is_none() && p.air_quality.is_none()));

    for winner in [
        result.fastest(),
        result.eco_friendly(),
        result.best_overall(),
        result.least_traffic(),
        result.longest(),
    ] {
        assert_eq!(winner.id, only.id);
    }
}

#[tokio::test]
async fn test_fast_route_versus_clean_route() {
    // Route A runs along lng 77.5 with congested roads, route B along lng 78.5
    // with nearly free-flowing roads.
    let traffic = TrafficFn(|p: &Coordinates| {
        let current = if p.lng < 78.0 { 30.0 } else { 57.0 };
        TrafficReading::new(current, 60.0).map_err(AppError::TrafficApi)
    });
    let air_quality = AirQualityFn(|_: &Coordinates| Ok(AirQualityReading::new(50)));
    let evaluator = common::evaluator_with(traffic, air_quality, common::test_config());

    let route_a = common::line_route(77.5, 12, 20_000.0, 900.0);
    let route_b = common::line_route(78.5, 12, 15_000.0, 1_200.0);

    let result = evaluator
        .evaluate(vec![route_a, route_b], &common::diesel_trip(0.0, 10.0))
        .await
        .unwrap();

    let a = &result.routes()[0];
    let b = &result.routes()[1];
    assert_eq!(a.details.len(), 5);
    assert_eq!(b.details.len(), 5);

    let carbon_a = 20_000.0 / 10.0 * 0.26;
    let carbon_b = 15_000.0 / 10.0 * 0.26;
    assert!((a.total_carbon - carbon_a).abs() < 1e-9);
    assert!((b.total_carbon - carbon_b).abs() < 1e-9);

    let expected_a = 5.0 * ((100.0 - 50.0) + 30.0 / 60.0 * 100.0)
        - carbon_a * 10.0
        - 20_000.0 * 0.1
        - 900.0 / 60.0;
    let expected_b = 5.0 * ((100.0 - 50.0) + 57.0 / 60.0 * 100.0)
        - carbon_b * 10.0
        - 15_000.0 * 0.1
        - 1_200.0 / 60.0;
    assert!((a.score - expected_a).abs() < 1e-9, "score A {}", a.score);
    assert!((b.score - expected_b).abs() < 1e-9, "score B {}", b.score);
    assert!(b.score > a.score);

    assert_eq!(result.fastest().id, a.id);
    assert_eq!(result.eco_friendly().id, b.id);
    assert_eq!(result.best_overall().id, b.id);
    assert_eq!(result.least_traffic().id, b.id);
    assert_eq!(result.longest().id, a.id);
}

#[tokio::test]
async fn test_empty_candidate_list_is_an_error() {
    let evaluator = common::evaluator_with(
        common::traffic_down(),
        common::air_quality_down(),
        common::test_config(),
    );

    let err = evaluator
        .evaluate(vec![], &common::diesel_trip(0.0, 10.0))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NoRoutesFound(_)));
}

#[tokio::test]
async fn test_equal_durations_keep_first_route_as_fastest() {
    let evaluator = common::evaluator_with(
        common::traffic_down(),
        common::air_quality_down(),
        common::test_config(),
    );
    let first = common::line_route(77.2, 4, 9_000.0, 700.0);
    let second = common::line_route(77.3, 4, 12_000.0, 700.0);

    let result = evaluator
        .evaluate(vec![first, second], &common::diesel_trip(10.0, 8.0))
        .await
        .unwrap();

    assert_eq!(result.selection().fastest, 0);
    assert_eq!(result.selection().longest, 1);
}

#[tokio::test]
async fn test_partial_failures_are_absorbed() {
    // Traffic only answers in the southern half of the route
    let traffic = TrafficFn(|p: &Coordinates| {
        if p.lat < 27.05 {
            Ok(TrafficReading::new(40.0, 50.0).unwrap())
        } else {
            Err(AppError::TrafficApi("HTTP 400: point off network".to_string()))
        }
    });
    let evaluator =
        common::evaluator_with(traffic, common::air_quality_down(), common::test_config());
    let route = common::line_route(77.2, 12, 5_000.0, 420.0);

    let result = evaluator
        .evaluate(vec![route], &common::diesel_trip(0.0, 12.0))
        .await
        .unwrap();

    let details = &result.routes()[0].details;
    assert_eq!(details.len(), 5);
    assert!(details.iter().any(|p| p.traffic.is_some()));
    assert!(details.iter().any(|p| p.traffic.is_none()));
    assert!(details.iter().all(|p| p.air_quality.is_none()));
}

/// Answers slower for points further south so completions arrive reversed
struct ReversedAirQuality;

#[async_trait]
impl AirQualitySource for ReversedAirQuality {
    async fn air_quality_at(&self, point: &Coordinates) -> Result<AirQualityReading> {
        let step = ((point.lat - 27.0) * 100.0).round() as u64;
        tokio::time::sleep(Duration::from_millis(120u64.saturating_sub(step * 10))).await;
        Ok(AirQualityReading::new(step as u32))
    }
}

#[tokio::test]
async fn test_sample_points_stay_aligned_with_sampled_coordinates() {
    let evaluator =
        common::evaluator_with(common::traffic_down(), ReversedAirQuality, common::test_config());
    let route = common::line_route(77.2, 12, 5_000.0, 420.0);

    let result = evaluator
        .evaluate(vec![route.clone()], &common::diesel_trip(0.0, 12.0))
        .await
        .unwrap();

    // 12 points sampled down to 5: indices 2, 4, 6, 8, 10
    let details = &result.routes()[0].details;
    let indices: Vec<u32> = details
        .iter()
        .map(|p| p.air_quality.as_ref().unwrap().aqi)
        .collect();
    assert_eq!(indices, vec![2, 4, 6, 8, 10]);

    for (point, idx) in details.iter().zip([2usize, 4, 6, 8, 10]) {
        assert_eq!(point.longitude, route.geometry[idx][0]);
        assert_eq!(point.latitude, route.geometry[idx][1]);
    }
}

/// Records the highest number of simultaneous lookups
struct CountingTraffic {
    in_flight: AtomicUsize,
    peak: Arc<AtomicUsize>,
}

#[async_trait]
impl TrafficSource for CountingTraffic {
    async fn traffic_at(&self, _point: &Coordinates) -> Result<TrafficReading> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(TrafficReading::new(50.0, 50.0).unwrap())
    }
}

#[tokio::test]
async fn test_fan_out_is_bounded() {
    let peak = Arc::new(AtomicUsize::new(0));
    let counter = CountingTraffic {
        in_flight: AtomicUsize::new(0),
        peak: peak.clone(),
    };
    let mut config = common::test_config();
    config.point_concurrency = 2;
    config.route_concurrency = 2;

    let evaluator = common::evaluator_with(counter, common::air_quality_down(), config);
    let routes = vec![
        common::line_route(77.1, 20, 8_000.0, 600.0),
        common::line_route(77.2, 20, 8_000.0, 600.0),
        common::line_route(77.3, 20, 8_000.0, 600.0),
    ];

    let result = evaluator
        .evaluate(routes, &common::diesel_trip(0.0, 10.0))
        .await
        .unwrap();

    assert_eq!(result.routes().len(), 3);
    assert!(result
        .routes()
        .iter()
        .all(|r| r.details.iter().all(|p| p.traffic.is_some())));

    let peak = peak.load(Ordering::SeqCst);
    assert!(peak >= 2, "expected concurrent lookups, peak was {}", peak);
    assert!(peak <= 4, "fan-out exceeded its bound, peak was {}", peak);
}

struct StalledTraffic;

#[async_trait]
impl TrafficSource for StalledTraffic {
    async fn traffic_at(&self, _point: &Coordinates) -> Result<TrafficReading> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(TrafficReading::new(50.0, 50.0).unwrap())
    }
}

#[tokio::test]
async fn test_request_deadline_yields_partial_result() {
    let mut config = common::test_config();
    config.fetch_timeout = Duration::from_millis(50);
    config.request_deadline = Duration::from_millis(50);

    let air_quality = AirQualityFn(|_: &Coordinates| Ok(AirQualityReading::new(35)));
    let evaluator = common::evaluator_with(StalledTraffic, air_quality, config);

    let started = std::time::Instant::now();
    let result = evaluator
        .evaluate(
            vec![common::line_route(77.2, 8, 6_000.0, 500.0)],
            &common::diesel_trip(0.0, 10.0),
        )
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    let details = &result.routes()[0].details;
    assert!(details.iter().all(|p| p.traffic.is_none()));
    assert!(details.iter().all(|p| p.air_quality.is_some()));
}

#[tokio::test]
async fn test_speed_ratio_policy_picks_freest_route() {
    // Route 0 is short (high score) but congested, route 1 is long but clear
    let traffic = TrafficFn(|p: &Coordinates| {
        let current = if p.lng < 78.0 { 10.0 } else { 60.0 };
        Ok(TrafficReading::new(current, 60.0).unwrap())
    });
    let mut config = common::test_config();
    config.least_traffic_policy = LeastTrafficPolicy::SpeedRatio;
    let evaluator = common::evaluator_with(traffic, common::air_quality_down(), config);

    let result = evaluator
        .evaluate(
            vec![
                common::line_route(77.5, 6, 4_000.0, 300.0),
                common::line_route(78.5, 6, 30_000.0, 1_800.0),
            ],
            &common::diesel_trip(0.0, 10.0),
        )
        .await
        .unwrap();

    assert_eq!(result.selection().best_overall, 0);
    assert_eq!(result.selection().least_traffic, 1);
}

#[test]
fn test_zero_concurrency_is_rejected_at_construction() {
    for (route_concurrency, point_concurrency) in [(0, 5), (3, 0)] {
        let mut config = common::test_config();
        config.route_concurrency = route_concurrency;
        config.point_concurrency = point_concurrency;

        let environment = EnvironmentFetcher::new(
            Arc::new(common::traffic_down()),
            Arc::new(common::air_quality_down()),
            &config,
        );
        assert!(RouteEvaluator::new(environment, config).is_err());
    }
}
