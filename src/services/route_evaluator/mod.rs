pub mod emissions;
pub mod sampling;
pub mod scoring;
pub mod selection;

use crate::config::EvaluatorConfig;
use crate::error::{AppError, Result};
use crate::models::{CandidateRoute, EnrichedRoute, SamplePoint, TripParameters};
use crate::services::environment::EnvironmentFetcher;
use futures::stream::{self, StreamExt};
use tokio::time::Instant;

use emissions::estimate_carbon_kg;
use sampling::sample_coordinates;
use scoring::score_route;
pub use selection::{Selection, SelectionResult};

/// Enriches, scores and ranks the candidate routes of one request.
///
/// Routes are enriched `route_concurrency` at a time and the sample points of
/// each route `point_concurrency` at a time. Results are gathered in input
/// order, so sample points stay index-aligned with the sampled coordinates and
/// ties in selection resolve to the earliest candidate.
pub struct RouteEvaluator {
    environment: EnvironmentFetcher,
    config: EvaluatorConfig,
}

impl RouteEvaluator {
    /// Rejects settings the fan-out cannot run with, such as a zero
    /// concurrency limit.
    pub fn new(
        environment: EnvironmentFetcher,
        config: EvaluatorConfig,
    ) -> std::result::Result<Self, String> {
        config.validate()?;
        Ok(RouteEvaluator {
            environment,
            config,
        })
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Fails with `NoRoutesFound` on an empty candidate list; otherwise every
    /// slot of the result is populated.
    pub async fn evaluate(
        &self,
        candidates: Vec<CandidateRoute>,
        trip: &TripParameters,
    ) -> Result<SelectionResult> {
        if candidates.is_empty() {
            return Err(AppError::NoRoutesFound(
                "Cannot select among zero candidate routes".to_string(),
            ));
        }

        let candidate_count = candidates.len();
        let deadline = Instant::now() + self.config.request_deadline;

        tracing::info!(
            candidates = candidate_count,
            sample_points = self.config.sample_points,
            fuel_type = %trip.fuel_type,
            "Evaluating {} candidate routes",
            candidate_count
        );

        let routes: Vec<EnrichedRoute> = stream::iter(candidates)
            .map(|candidate| self.evaluate_route(candidate, trip, deadline))
            .buffered(self.config.route_concurrency)
            .collect()
            .await;

        let result = SelectionResult::new(routes, self.config.least_traffic_policy)
            .ok_or_else(|| AppError::Internal("Selection produced no winners".to_string()))?;

        let selection = result.selection();
        tracing::info!(
            fastest = selection.fastest,
            eco_friendly = selection.eco_friendly,
            best_overall = selection.best_overall,
            least_traffic = selection.least_traffic,
            longest = selection.longest,
            "Selected winners among {} routes",
            candidate_count
        );

        Ok(result)
    }

    /// Enrich one candidate and score it.
    pub async fn evaluate_route(
        &self,
        route: CandidateRoute,
        trip: &TripParameters,
        deadline: Instant,
    ) -> EnrichedRoute {
        let (details, total_carbon) = self.enrich(&route, trip, deadline).await;
        let score = score_route(&details, total_carbon, route.distance, route.duration);

        tracing::debug!(
            distance_m = route.distance,
            duration_s = route.duration,
            total_carbon = %format!("{:.2}", total_carbon),
            score = %format!("{:.2}", score),
            "Route scored"
        );

        EnrichedRoute::new(route, details, total_carbon, score)
    }

    /// Sample readings along the route and estimate its emissions. Carbon uses
    /// the full route distance, not the distance between samples.
    pub async fn enrich(
        &self,
        route: &CandidateRoute,
        trip: &TripParameters,
        deadline: Instant,
    ) -> (Vec<SamplePoint>, f64) {
        let sampled = sample_coordinates(&route.geometry, self.config.sample_points);

        let details: Vec<SamplePoint> = stream::iter(sampled)
            .map(|position| self.environment.sample(position, deadline))
            .buffered(self.config.point_concurrency)
            .collect()
            .await;

        (details, estimate_carbon_kg(route.distance, trip))
    }
}
