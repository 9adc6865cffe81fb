use crate::error::{AppError, Result};
use crate::models::{CandidateRoute, Coordinates};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const OSRM_ROUTE_BASE_URL: &str = "https://router.project-osrm.org/route/v1/driving";

/// Source of candidate routes between two points.
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Returns every alternative the provider offers, in provider order.
    /// Fails with `NoRoutesFound` when there is nothing usable.
    async fn candidate_routes(
        &self,
        start: &Coordinates,
        end: &Coordinates,
    ) -> Result<Vec<CandidateRoute>>;
}

#[derive(Clone)]
pub struct OsrmClient {
    client: Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new() -> Self {
        OsrmClient {
            client: Client::new(),
            base_url: OSRM_ROUTE_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(base_url: String) -> Self {
        OsrmClient {
            client: Client::new(),
            base_url,
        }
    }
}

impl Default for OsrmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoutingProvider for OsrmClient {
    async fn candidate_routes(
        &self,
        start: &Coordinates,
        end: &Coordinates,
    ) -> Result<Vec<CandidateRoute>> {
        // OSRM expects "lng,lat;lng,lat"
        let url = format!(
            "{}/{},{};{},{}",
            self.base_url, start.lng, start.lat, end.lng, end.lat
        );

        tracing::debug!(
            start_lat = start.lat,
            start_lng = start.lng,
            end_lat = end.lat,
            end_lng = end.lng,
            "OSRM request with alternatives"
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("alternatives", "true"),
            ])
            .send()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Failed to read response: {}", e)))?;

        // OSRM reports "NoRoute" with HTTP 400 and a JSON body, so parse before
        // judging the status.
        let parsed: Option<OsrmRouteApiResponse> = serde_json::from_str(&body).ok();

        if let Some(ref directions) = parsed {
            if directions.code == "NoRoute" {
                return Err(AppError::NoRoutesFound(
                    "Routing provider found no path between the two locations".to_string(),
                ));
            }
        }

        if !status.is_success() {
            tracing::warn!(status = %status, "OSRM HTTP error {}: {}", status, body);
            return Err(AppError::RoutingApi(format!("HTTP {}: {}", status, body)));
        }

        let directions = parsed
            .ok_or_else(|| AppError::RoutingApi("Failed to parse response".to_string()))?;

        if directions.code != "Ok" {
            return Err(AppError::RoutingApi(format!(
                "Provider returned code {}: {}",
                directions.code,
                directions.message.unwrap_or_default()
            )));
        }

        let routes = directions.into_candidates();
        if routes.is_empty() {
            tracing::warn!("OSRM returned no usable routes");
            return Err(AppError::NoRoutesFound(
                "Routing provider returned no routes".to_string(),
            ));
        }

        tracing::debug!(alternatives = routes.len(), "OSRM returned {} routes", routes.len());
        Ok(routes)
    }
}

// OSRM API response types

#[derive(Debug, Deserialize)]
struct OsrmRouteApiResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64, // meters
    duration: f64, // seconds
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>, // [lng, lat] pairs
}

impl OsrmRouteApiResponse {
    /// Keeps provider order and drops alternatives that break route invariants
    fn into_candidates(self) -> Vec<CandidateRoute> {
        self.routes
            .into_iter()
            .enumerate()
            .filter_map(|(idx, route)| {
                match CandidateRoute::new(route.geometry.coordinates, route.distance, route.duration)
                {
                    Ok(candidate) => Some(candidate),
                    Err(e) => {
                        tracing::warn!(alternative = idx, "Dropping OSRM route: {}", e);
                        None
                    }
                }
            })
            .collect()
    }
}
