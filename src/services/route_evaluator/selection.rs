use crate::config::LeastTrafficPolicy;
use crate::models::legacy::LegacyEvaluateResponse;
use crate::models::route::EvaluateRouteResponse;
use crate::models::EnrichedRoute;

/// Winning route index for each category. Several categories may share an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub fastest: usize,
    pub eco_friendly: usize,
    pub best_overall: usize,
    pub least_traffic: usize,
    pub longest: usize,
}

impl Selection {
    fn all(idx: usize) -> Self {
        Selection {
            fastest: idx,
            eco_friendly: idx,
            best_overall: idx,
            least_traffic: idx,
            longest: idx,
        }
    }

    /// A later route only takes a slot on strict improvement, so ties keep the
    /// earliest route.
    fn observe(
        self,
        routes: &[EnrichedRoute],
        idx: usize,
        policy: LeastTrafficPolicy,
    ) -> Self {
        let candidate = &routes[idx];
        let pick = |current: usize, better: fn(&EnrichedRoute, &EnrichedRoute) -> bool| {
            if better(candidate, &routes[current]) {
                idx
            } else {
                current
            }
        };

        let least_traffic_better = match policy {
            LeastTrafficPolicy::CompositeScore => higher_score,
            LeastTrafficPolicy::SpeedRatio => freer_flowing,
        };

        Selection {
            fastest: pick(self.fastest, |a, b| a.route.duration < b.route.duration),
            eco_friendly: pick(self.eco_friendly, |a, b| a.total_carbon < b.total_carbon),
            best_overall: pick(self.best_overall, higher_score),
            least_traffic: pick(self.least_traffic, least_traffic_better),
            longest: pick(self.longest, |a, b| a.route.distance > b.route.distance),
        }
    }
}

fn higher_score(a: &EnrichedRoute, b: &EnrichedRoute) -> bool {
    a.score > b.score
}

/// Routes without any traffic reading rank below routes with one.
fn freer_flowing(a: &EnrichedRoute, b: &EnrichedRoute) -> bool {
    match (
        a.summary.average_speed_ratio,
        b.summary.average_speed_ratio,
    ) {
        (Some(a), Some(b)) => a > b,
        (Some(_), None) => true,
        _ => false,
    }
}

/// Pick the winners in one pass over `routes`. `None` only for an empty slice.
pub fn select_routes(routes: &[EnrichedRoute], policy: LeastTrafficPolicy) -> Option<Selection> {
    if routes.is_empty() {
        return None;
    }

    Some(
        (1..routes.len()).fold(Selection::all(0), |selection, idx| {
            selection.observe(routes, idx, policy)
        }),
    )
}

/// Every enriched route of one evaluation plus the winners among them.
#[derive(Debug, Clone)]
pub struct SelectionResult {
    routes: Vec<EnrichedRoute>,
    selection: Selection,
}

impl SelectionResult {
    /// `None` when there is nothing to select from.
    pub fn new(routes: Vec<EnrichedRoute>, policy: LeastTrafficPolicy) -> Option<Self> {
        let selection = select_routes(&routes, policy)?;
        Some(SelectionResult { routes, selection })
    }

    pub fn routes(&self) -> &[EnrichedRoute] {
        &self.routes
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn fastest(&self) -> &EnrichedRoute {
        &self.routes[self.selection.fastest]
    }

    pub fn eco_friendly(&self) -> &EnrichedRoute {
        &self.routes[self.selection.eco_friendly]
    }

    pub fn best_overall(&self) -> &EnrichedRoute {
        &self.routes[self.selection.best_overall]
    }

    pub fn least_traffic(&self) -> &EnrichedRoute {
        &self.routes[self.selection.least_traffic]
    }

    pub fn longest(&self) -> &EnrichedRoute {
        &self.routes[self.selection.longest]
    }

    pub fn to_response(&self) -> EvaluateRouteResponse<'_> {
        EvaluateRouteResponse {
            best_route: self.best_overall(),
            least_traffic_route: self.least_traffic(),
            eco_friendly_route: self.eco_friendly(),
            fastest_route: self.fastest(),
            longest_route: self.longest(),
        }
    }

    /// Same winners in the shape the original web client reads.
    pub fn to_legacy_response(&self) -> LegacyEvaluateResponse<'_> {
        LegacyEvaluateResponse {
            best_route: self.best_overall().into(),
            least_traffic_route: self.least_traffic().into(),
            eco_friendly_route: self.eco_friendly().into(),
            fastest_route: self.fastest().into(),
            longest_route: self.longest().into(),
        }
    }
}
