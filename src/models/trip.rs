use crate::constants::*;
use std::fmt;
use std::str::FromStr;

/// Fuel identifier, matched case-insensitively but otherwise exactly, so
/// `" diesel "` is an unknown fuel. Unknown identifiers are kept so they can
/// be logged and still priced with the default factor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FuelType {
    Gasoline,
    Diesel,
    Electric,
    Other(String),
}

impl FuelType {
    /// kg CO2 per unit of fuel consumed
    pub fn emission_factor(&self) -> f64 {
        match self {
            FuelType::Gasoline => EMISSION_FACTOR_GASOLINE,
            FuelType::Diesel => EMISSION_FACTOR_DIESEL,
            FuelType::Electric => EMISSION_FACTOR_ELECTRIC,
            FuelType::Other(_) => EMISSION_FACTOR_DEFAULT,
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelType::Gasoline => write!(f, "gasoline"),
            FuelType::Diesel => write!(f, "diesel"),
            FuelType::Electric => write!(f, "electric"),
            FuelType::Other(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for FuelType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "gasoline" => FuelType::Gasoline,
            "diesel" => FuelType::Diesel,
            "electric" => FuelType::Electric,
            other => FuelType::Other(other.to_string()),
        })
    }
}

/// Vehicle and load parameters shared by every candidate of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct TripParameters {
    pub load_weight: f64,
    pub fuel_type: FuelType,
    /// Distance per unit of fuel, in the same distance unit as the route
    pub fuel_efficiency: f64,
}

impl TripParameters {
    pub fn new(load_weight: f64, fuel_type: FuelType, fuel_efficiency: f64) -> Result<Self, String> {
        if !fuel_efficiency.is_finite() || fuel_efficiency <= 0.0 {
            return Err(format!(
                "Fuel efficiency must be a positive number, got {}",
                fuel_efficiency
            ));
        }
        if !load_weight.is_finite() || load_weight < 0.0 {
            return Err(format!(
                "Load weight must be a non-negative number, got {}",
                load_weight
            ));
        }
        Ok(TripParameters {
            load_weight,
            fuel_type,
            fuel_efficiency,
        })
    }
}
