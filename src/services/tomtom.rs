use crate::error::{AppError, Result};
use crate::models::{Coordinates, TrafficReading};
use crate::services::classify_http_failure;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const TOMTOM_FLOW_SEGMENT_URL: &str =
    "https://api.tomtom.com/traffic/services/4/flowSegmentData/absolute/10/json";

/// Live traffic flow lookups.
#[async_trait]
pub trait TrafficSource: Send + Sync {
    async fn traffic_at(&self, point: &Coordinates) -> Result<TrafficReading>;
}

#[derive(Clone)]
pub struct TomTomClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TomTomClient {
    pub fn new(api_key: String) -> Self {
        TomTomClient {
            client: Client::new(),
            api_key,
            base_url: TOMTOM_FLOW_SEGMENT_URL.to_string(),
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        TomTomClient {
            client: Client::new(),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl TrafficSource for TomTomClient {
    async fn traffic_at(&self, point: &Coordinates) -> Result<TrafficReading> {
        let point_param = format!("{},{}", point.lat, point.lng);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("key", self.api_key.as_str()), ("point", point_param.as_str())])
            .send()
            .await
            .map_err(|e| AppError::UpstreamTransient(format!("TomTom request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_http_failure(
                "TomTom",
                status,
                error_text,
                AppError::TrafficApi,
            ));
        }

        let flow: TomTomFlowResponse = response
            .json()
            .await
            .map_err(|e| AppError::TrafficApi(format!("Failed to parse response: {}", e)))?;

        flow.into_reading().map_err(AppError::TrafficApi)
    }
}

// TomTom API response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TomTomFlowResponse {
    flow_segment_data: FlowSegmentData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowSegmentData {
    current_speed: f64,
    free_flow_speed: f64,
    #[serde(default)]
    current_travel_time: Option<f64>,
    #[serde(default)]
    free_flow_travel_time: Option<f64>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    road_closure: Option<bool>,
    #[serde(default)]
    frc: Option<String>,
}

impl TomTomFlowResponse {
    fn into_reading(self) -> std::result::Result<TrafficReading, String> {
        let data = self.flow_segment_data;
        let mut reading = TrafficReading::new(data.current_speed, data.free_flow_speed)?;
        reading.current_travel_time = data.current_travel_time;
        reading.free_flow_travel_time = data.free_flow_travel_time;
        reading.confidence = data.confidence;
        reading.road_closure = data.road_closure;
        reading.frc = data.frc;
        Ok(reading)
    }
}
