use crate::constants::LOAD_WEIGHT_EMISSION_FACTOR;
use crate::models::TripParameters;

/// Estimated kg CO2 for driving `distance` with the given trip parameters.
///
/// `fuel consumed = distance / efficiency`, priced by the fuel's emission
/// factor and inflated by 1% per unit of load weight. `TripParameters::new`
/// guarantees a positive efficiency.
pub fn estimate_carbon_kg(distance: f64, trip: &TripParameters) -> f64 {
    let fuel_consumed = distance / trip.fuel_efficiency;
    let weight_adjustment = 1.0 + trip.load_weight * LOAD_WEIGHT_EMISSION_FACTOR;

    fuel_consumed * trip.fuel_type.emission_factor() * weight_adjustment
}
