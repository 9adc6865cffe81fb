use crate::constants::*;
use crate::models::readings::SamplePoint;
use crate::models::trip::{FuelType, TripParameters};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use std::fmt;
use uuid::Uuid;

/// One alternative returned by the routing provider for an origin/destination pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateRoute {
    /// [lng, lat] positions, written as a GeoJSON LineString
    #[serde(with = "line_string")]
    pub geometry: Vec<[f64; 2]>,
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
}

impl CandidateRoute {
    pub fn new(geometry: Vec<[f64; 2]>, distance: f64, duration: f64) -> Result<Self, String> {
        if geometry.len() < 2 {
            return Err(format!(
                "Route geometry needs at least 2 points, got {}",
                geometry.len()
            ));
        }
        if !distance.is_finite() || distance < 0.0 {
            return Err(format!("Invalid route distance: {}", distance));
        }
        if !duration.is_finite() || duration < 0.0 {
            return Err(format!("Invalid route duration: {}", duration));
        }
        Ok(CandidateRoute {
            geometry,
            distance,
            duration,
        })
    }

    pub fn distance_km(&self) -> f64 {
        self.distance / 1000.0
    }

    pub fn duration_minutes(&self) -> u32 {
        (self.duration / 60.0).round() as u32
    }
}

mod line_string {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct LineStringRef<'a> {
        #[serde(rename = "type")]
        kind: &'static str,
        coordinates: &'a [[f64; 2]],
    }

    #[derive(Deserialize)]
    struct LineStringOwned {
        coordinates: Vec<[f64; 2]>,
    }

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer>(
        positions: &Vec<[f64; 2]>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        LineStringRef {
            kind: "LineString",
            coordinates: positions,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<[f64; 2]>, D::Error> {
        LineStringOwned::deserialize(deserializer).map(|line| line.coordinates)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLevel {
    Light,
    Moderate,
    Heavy,
    Unknown,
}

impl TrafficLevel {
    pub fn from_speed_ratio(ratio: Option<f64>) -> Self {
        match ratio {
            Some(r) if r >= TRAFFIC_LIGHT_MIN_RATIO => TrafficLevel::Light,
            Some(r) if r >= TRAFFIC_MODERATE_MIN_RATIO => TrafficLevel::Moderate,
            Some(_) => TrafficLevel::Heavy,
            None => TrafficLevel::Unknown,
        }
    }
}

impl fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrafficLevel::Light => write!(f, "light"),
            TrafficLevel::Moderate => write!(f, "moderate"),
            TrafficLevel::Heavy => write!(f, "heavy"),
            TrafficLevel::Unknown => write!(f, "unknown"),
        }
    }
}

/// US EPA AQI categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AirQualityBand {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AirQualityBand {
    pub fn from_aqi(aqi: f64) -> Self {
        match aqi {
            a if a <= 50.0 => AirQualityBand::Good,
            a if a <= 100.0 => AirQualityBand::Moderate,
            a if a <= 150.0 => AirQualityBand::UnhealthySensitive,
            a if a <= 200.0 => AirQualityBand::Unhealthy,
            a if a <= 300.0 => AirQualityBand::VeryUnhealthy,
            _ => AirQualityBand::Hazardous,
        }
    }
}

/// Display-oriented aggregates over the sampled readings of a route
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub distance_km: f64,
    pub duration_minutes: u32,
    pub average_aqi: Option<f64>,
    pub average_speed_ratio: Option<f64>,
    pub traffic_level: TrafficLevel,
    pub air_quality_band: Option<AirQualityBand>,
}

impl RouteSummary {
    pub fn from_samples(route: &CandidateRoute, details: &[SamplePoint]) -> Self {
        let average_aqi = mean(
            details
                .iter()
                .filter_map(|p| p.air_quality.as_ref())
                .map(|aq| aq.aqi as f64),
        );
        let average_speed_ratio = mean(
            details
                .iter()
                .filter_map(|p| p.traffic.as_ref())
                .map(|t| t.speed_ratio()),
        );

        RouteSummary {
            distance_km: route.distance_km(),
            duration_minutes: route.duration_minutes(),
            average_aqi,
            average_speed_ratio,
            traffic_level: TrafficLevel::from_speed_ratio(average_speed_ratio),
            air_quality_band: average_aqi.map(AirQualityBand::from_aqi),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// A candidate route with its sampled readings, emission estimate and score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRoute {
    pub id: Uuid,
    pub route: CandidateRoute,
    /// Sample points, index-aligned with the sampled coordinates
    pub details: Vec<SamplePoint>,
    /// Estimated kg CO2 for the whole route
    pub total_carbon: f64,
    /// Relative ranking key, only comparable within one evaluation
    pub score: f64,
    pub summary: RouteSummary,
}

impl EnrichedRoute {
    pub fn new(route: CandidateRoute, details: Vec<SamplePoint>, total_carbon: f64, score: f64) -> Self {
        let summary = RouteSummary::from_samples(&route, &details);
        EnrichedRoute {
            id: Uuid::new_v4(),
            route,
            details,
            total_carbon,
            score,
            summary,
        }
    }
}

// Request/Response types for API endpoints

/// Numeric fields accept JSON numbers or numeric strings, since the web
/// client posts its form values as strings.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRouteRequest {
    pub starting_point: String,
    pub final_destination: String,
    pub fuel_type: String,
    /// Fuel efficiency, distance per unit of fuel
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub vehicle_average: f64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub load_weight: f64,
}

impl EvaluateRouteRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.starting_point.trim().is_empty() {
            return Err("startingPoint must not be empty".to_string());
        }
        if self.final_destination.trim().is_empty() {
            return Err("finalDestination must not be empty".to_string());
        }
        self.trip_parameters().map(|_| ())
    }

    pub fn trip_parameters(&self) -> Result<TripParameters, String> {
        let fuel_type: FuelType = match self.fuel_type.parse() {
            Ok(fuel) => fuel,
            Err(never) => match never {},
        };
        TripParameters::new(self.load_weight, fuel_type, self.vehicle_average)
    }
}

/// The five named winners. Slots may reference the same route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRouteResponse<'a> {
    pub best_route: &'a EnrichedRoute,
    pub least_traffic_route: &'a EnrichedRoute,
    pub eco_friendly_route: &'a EnrichedRoute,
    pub fastest_route: &'a EnrichedRoute,
    pub longest_route: &'a EnrichedRoute,
}
