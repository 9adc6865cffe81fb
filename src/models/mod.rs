pub mod coordinates;
pub mod legacy;
pub mod readings;
pub mod route;
pub mod trip;

pub use coordinates::Coordinates;
pub use readings::{AirQualityReading, SamplePoint, TrafficReading};
pub use route::{CandidateRoute, EnrichedRoute, RouteSummary};
pub use trip::{FuelType, TripParameters};
