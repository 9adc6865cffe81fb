use crate::constants::*;
use crate::models::SamplePoint;

/// Composite score of a route, higher is better.
///
/// Each sample point adds `100 - aqi` and `speed_ratio * 100` for the readings
/// it has; missing readings add nothing. Carbon, distance (meters) and
/// duration (seconds) are then subtracted. The result is unbounded and only
/// meaningful relative to routes scored with the same trip parameters.
pub fn score_route(details: &[SamplePoint], total_carbon: f64, distance: f64, duration: f64) -> f64 {
    let sample_score: f64 = details
        .iter()
        .map(|point| air_quality_term(point) + traffic_term(point))
        .sum();

    sample_score
        - total_carbon * CARBON_PENALTY_PER_KG
        - distance * DISTANCE_PENALTY_PER_METER
        - duration / DURATION_PENALTY_DIVISOR
}

/// Negative once the index exceeds the baseline, so heavy pollution penalizes.
fn air_quality_term(point: &SamplePoint) -> f64 {
    point
        .air_quality
        .as_ref()
        .map_or(0.0, |aq| AQI_SCORE_BASELINE - aq.aqi as f64)
}

fn traffic_term(point: &SamplePoint) -> f64 {
    point
        .traffic
        .as_ref()
        .map_or(0.0, |t| t.speed_ratio() * SPEED_RATIO_SCORE_WEIGHT)
}
