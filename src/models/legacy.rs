//! Response shape read by the original web client on `POST /data`.
//!
//! Readings are nested the way the providers return them: traffic under
//! `flowSegmentData`, air quality under `data` with WAQI field names.

use crate::models::readings::{AirQualityReading, SamplePoint, TrafficReading};
use crate::models::route::{CandidateRoute, EnrichedRoute};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyEvaluateResponse<'a> {
    pub best_route: LegacyRoute<'a>,
    pub least_traffic_route: LegacyRoute<'a>,
    pub eco_friendly_route: LegacyRoute<'a>,
    pub fastest_route: LegacyRoute<'a>,
    pub longest_route: LegacyRoute<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRoute<'a> {
    pub id: Uuid,
    pub route: &'a CandidateRoute,
    pub details: Vec<LegacyDetail<'a>>,
    pub total_carbon: f64,
    pub score: f64,
}

impl<'a> From<&'a EnrichedRoute> for LegacyRoute<'a> {
    fn from(enriched: &'a EnrichedRoute) -> Self {
        LegacyRoute {
            id: enriched.id,
            route: &enriched.route,
            details: enriched.details.iter().map(LegacyDetail::from).collect(),
            total_carbon: enriched.total_carbon,
            score: enriched.score,
        }
    }
}

/// Absent readings serialize as `null`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDetail<'a> {
    pub latitude: f64,
    pub longitude: f64,
    pub traffic: Option<TrafficEnvelope<'a>>,
    pub air_quality: Option<AirQualityEnvelope<'a>>,
}

impl<'a> From<&'a SamplePoint> for LegacyDetail<'a> {
    fn from(point: &'a SamplePoint) -> Self {
        LegacyDetail {
            latitude: point.latitude,
            longitude: point.longitude,
            traffic: point.traffic.as_ref().map(|flow_segment_data| TrafficEnvelope {
                flow_segment_data,
            }),
            air_quality: point.air_quality.as_ref().map(AirQualityEnvelope::from),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficEnvelope<'a> {
    pub flow_segment_data: &'a TrafficReading,
}

#[derive(Debug, Serialize)]
pub struct AirQualityEnvelope<'a> {
    pub data: AirQualityData<'a>,
}

#[derive(Debug, Serialize)]
pub struct AirQualityData<'a> {
    pub aqi: u32,
    pub dominentpol: Option<&'a str>,
    pub city: Option<StationName<'a>>,
}

#[derive(Debug, Serialize)]
pub struct StationName<'a> {
    pub name: &'a str,
}

impl<'a> From<&'a AirQualityReading> for AirQualityEnvelope<'a> {
    fn from(reading: &'a AirQualityReading) -> Self {
        AirQualityEnvelope {
            data: AirQualityData {
                aqi: reading.aqi,
                dominentpol: reading.dominant_pollutant.as_deref(),
                city: reading.station.as_deref().map(|name| StationName { name }),
            },
        }
    }
}
