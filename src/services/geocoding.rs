use crate::error::{AppError, Result};
use crate::models::Coordinates;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

const OPENWEATHER_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Resolves a place name to a coordinate.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `LocationNotFound` when the name does not resolve, an upstream error otherwise.
    async fn locate(&self, place: &str) -> Result<Coordinates>;
}

/// Uses the OpenWeatherMap current-weather endpoint, which resolves city names
/// and echoes the matched coordinates.
#[derive(Clone)]
pub struct OpenWeatherGeocoder {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherGeocoder {
    pub fn new(api_key: String) -> Self {
        OpenWeatherGeocoder {
            client: Client::new(),
            api_key,
            base_url: OPENWEATHER_WEATHER_URL.to_string(),
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        OpenWeatherGeocoder {
            client: Client::new(),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl Geocoder for OpenWeatherGeocoder {
    async fn locate(&self, place: &str) -> Result<Coordinates> {
        tracing::debug!(place = %place, "Geocoding request");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", place), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::GeocodingApi(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            return Err(AppError::LocationNotFound(format!(
                "Could not resolve location '{}'",
                place
            )));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = %status, place = %place, "Geocoding HTTP error {}: {}", status, error_text);
            return Err(AppError::GeocodingApi(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let weather: OpenWeatherResponse = response
            .json()
            .await
            .map_err(|e| AppError::GeocodingApi(format!("Failed to parse response: {}", e)))?;

        let coordinates = weather.coordinates().map_err(|e| {
            AppError::GeocodingApi(format!("Provider returned bad coordinates: {}", e))
        })?;

        tracing::debug!(
            place = %place,
            lat = coordinates.lat,
            lng = coordinates.lng,
            "Resolved '{}' to ({:.4}, {:.4})",
            place, coordinates.lat, coordinates.lng
        );
        Ok(coordinates)
    }
}

#[derive(Debug, Deserialize)]
struct OpenWeatherResponse {
    coord: OpenWeatherCoord,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherCoord {
    lat: f64,
    lon: f64,
}

impl OpenWeatherResponse {
    fn coordinates(&self) -> std::result::Result<Coordinates, String> {
        Coordinates::new(self.coord.lat, self.coord.lon)
    }
}
