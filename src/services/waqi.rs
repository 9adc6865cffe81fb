use crate::error::{AppError, Result};
use crate::models::{AirQualityReading, Coordinates};
use crate::services::classify_http_failure;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

const WAQI_FEED_BASE_URL: &str = "https://api.waqi.info/feed";

/// Air-quality index lookups.
#[async_trait]
pub trait AirQualitySource: Send + Sync {
    async fn air_quality_at(&self, point: &Coordinates) -> Result<AirQualityReading>;
}

#[derive(Clone)]
pub struct WaqiClient {
    client: Client,
    token: String,
    base_url: String,
}

impl WaqiClient {
    pub fn new(token: String) -> Self {
        WaqiClient {
            client: Client::new(),
            token,
            base_url: WAQI_FEED_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(token: String, base_url: String) -> Self {
        WaqiClient {
            client: Client::new(),
            token,
            base_url,
        }
    }
}

#[async_trait]
impl AirQualitySource for WaqiClient {
    async fn air_quality_at(&self, point: &Coordinates) -> Result<AirQualityReading> {
        let url = format!("{}/geo:{};{}/", self.base_url, point.lat, point.lng);

        let response = self
            .client
            .get(&url)
            .query(&[("token", self.token.as_str())])
            .send()
            .await
            .map_err(|e| AppError::UpstreamTransient(format!("WAQI request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_http_failure(
                "WAQI",
                status,
                error_text,
                AppError::AirQualityApi,
            ));
        }

        let feed: WaqiFeedResponse = response
            .json()
            .await
            .map_err(|e| AppError::AirQualityApi(format!("Failed to parse response: {}", e)))?;

        feed.into_reading().map_err(AppError::AirQualityApi)
    }
}

// WAQI API response types. `data` is an object on success and a message
// string on error, and `aqi` is "-" when a station has no current value.

#[derive(Debug, Deserialize)]
struct WaqiFeedResponse {
    status: String,
    data: Value,
}

#[derive(Debug, Deserialize)]
struct WaqiFeedData {
    aqi: Value,
    #[serde(default)]
    dominentpol: Option<String>,
    #[serde(default)]
    city: Option<WaqiCity>,
}

#[derive(Debug, Deserialize)]
struct WaqiCity {
    name: Option<String>,
}

impl WaqiFeedResponse {
    fn into_reading(self) -> std::result::Result<AirQualityReading, String> {
        if self.status != "ok" {
            let message = self
                .data
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| self.data.to_string());
            return Err(format!("Provider status '{}': {}", self.status, message));
        }

        let data: WaqiFeedData =
            serde_json::from_value(self.data).map_err(|e| format!("Unexpected data block: {}", e))?;

        let aqi = match data.aqi.as_f64() {
            Some(v) if v.is_finite() && v >= 0.0 => v.round() as u32,
            _ => return Err(format!("No usable AQI value: {}", data.aqi)),
        };

        Ok(AirQualityReading {
            aqi,
            dominant_pollutant: data.dominentpol.filter(|p| !p.is_empty()),
            station: data.city.and_then(|c| c.name),
        })
    }
}
