use serde::{Deserialize, Serialize};

/// Live flow on the road segment nearest to a sample point.
/// Speeds share one unit (the provider reports km/h).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrafficReading {
    pub current_speed: f64,
    pub free_flow_speed: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_travel_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_flow_travel_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_closure: Option<bool>,
    /// Functional road class, e.g. "FRC0" for motorways
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frc: Option<String>,
}

impl TrafficReading {
    /// Rejects readings whose speed ratio would be undefined or meaningless.
    pub fn new(current_speed: f64, free_flow_speed: f64) -> Result<Self, String> {
        if !current_speed.is_finite() || current_speed < 0.0 {
            return Err(format!("Invalid current speed: {}", current_speed));
        }
        if !free_flow_speed.is_finite() || free_flow_speed <= 0.0 {
            return Err(format!(
                "Invalid free-flow speed: {} (must be greater than 0)",
                free_flow_speed
            ));
        }
        Ok(TrafficReading {
            current_speed,
            free_flow_speed,
            current_travel_time: None,
            free_flow_travel_time: None,
            confidence: None,
            road_closure: None,
            frc: None,
        })
    }

    pub fn speed_ratio(&self) -> f64 {
        self.current_speed / self.free_flow_speed
    }
}

/// Air-quality index at the station nearest to a sample point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityReading {
    pub aqi: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_pollutant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
}

impl AirQualityReading {
    pub fn new(aqi: u32) -> Self {
        AirQualityReading {
            aqi,
            dominant_pollutant: None,
            station: None,
        }
    }
}

/// One sampled coordinate of a route with whatever readings could be fetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SamplePoint {
    pub latitude: f64,
    pub longitude: f64,
    pub traffic: Option<TrafficReading>,
    pub air_quality: Option<AirQualityReading>,
}

impl SamplePoint {
    pub fn new(
        latitude: f64,
        longitude: f64,
        traffic: Option<TrafficReading>,
        air_quality: Option<AirQualityReading>,
    ) -> Self {
        SamplePoint {
            latitude,
            longitude,
            traffic,
            air_quality,
        }
    }

    /// A point for which every fetch failed
    pub fn without_readings(latitude: f64, longitude: f64) -> Self {
        Self::new(latitude, longitude, None, None)
    }
}
