use crate::config::EvaluatorConfig;
use crate::error::Result;
use crate::models::{Coordinates, SamplePoint};
use crate::services::tomtom::TrafficSource;
use crate::services::waqi::AirQualitySource;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Fetches traffic and air-quality readings for sample points.
///
/// Failures never propagate: a reading that cannot be obtained (provider
/// error, invalid payload, timeout) is logged and recorded as absent.
#[derive(Clone)]
pub struct EnvironmentFetcher {
    traffic: Arc<dyn TrafficSource>,
    air_quality: Arc<dyn AirQualitySource>,
    fetch_timeout: Duration,
    max_retries: usize,
    retry_backoff: Duration,
}

impl EnvironmentFetcher {
    pub fn new(
        traffic: Arc<dyn TrafficSource>,
        air_quality: Arc<dyn AirQualitySource>,
        config: &EvaluatorConfig,
    ) -> Self {
        EnvironmentFetcher {
            traffic,
            air_quality,
            fetch_timeout: config.fetch_timeout,
            max_retries: config.fetch_max_retries,
            retry_backoff: config.retry_backoff,
        }
    }

    /// Build the sample point for a GeoJSON `[lng, lat]` position.
    /// Both lookups run concurrently and neither is allowed past `deadline`.
    pub async fn sample(&self, position: [f64; 2], deadline: Instant) -> SamplePoint {
        let [lng, lat] = position;
        let point = match Coordinates::from_lng_lat(position) {
            Ok(point) => point,
            Err(e) => {
                tracing::warn!(lat, lng, "Skipping lookups for sample point: {}", e);
                return SamplePoint::without_readings(lat, lng);
            }
        };

        let (traffic, air_quality) = tokio::join!(
            self.fetch("traffic", &point, deadline, || self.traffic.traffic_at(&point)),
            self.fetch("air_quality", &point, deadline, || {
                self.air_quality.air_quality_at(&point)
            }),
        );

        SamplePoint::new(lat, lng, traffic, air_quality)
    }

    async fn fetch<T, F, Fut>(
        &self,
        provider: &'static str,
        point: &Coordinates,
        deadline: Instant,
        call: F,
    ) -> Option<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let fetch_deadline = deadline.min(Instant::now() + self.fetch_timeout);

        match tokio::time::timeout_at(fetch_deadline, self.with_retry(provider, point, call)).await
        {
            Ok(Ok(reading)) => Some(reading),
            Ok(Err(e)) => {
                tracing::warn!(
                    provider,
                    lat = point.lat,
                    lng = point.lng,
                    error = %e,
                    "Reading unavailable, recording as absent"
                );
                None
            }
            Err(_) => {
                tracing::warn!(
                    provider,
                    lat = point.lat,
                    lng = point.lng,
                    "Reading timed out, recording as absent"
                );
                None
            }
        }
    }

    async fn with_retry<T, F, Fut>(
        &self,
        provider: &'static str,
        point: &Coordinates,
        call: F,
    ) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retry_count = 0;

        loop {
            match call().await {
                Ok(reading) => return Ok(reading),
                Err(e) if e.is_retryable() && retry_count < self.max_retries => {
                    retry_count += 1;
                    let backoff = self
                        .retry_backoff
                        .saturating_mul(2_u32.saturating_pow(retry_count as u32 - 1));

                    tracing::warn!(
                        provider,
                        lat = point.lat,
                        lng = point.lng,
                        "{} lookup failed ({}), retrying in {}ms (attempt {}/{})",
                        provider,
                        e,
                        backoff.as_millis(),
                        retry_count + 1,
                        self.max_retries + 1
                    );

                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
