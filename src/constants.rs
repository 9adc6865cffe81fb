//! Stable application-wide constants.
//!
//! Values here are emission and scoring coefficients, structural defaults, and
//! fallbacks for env-var-based configuration. They should rarely change.
//! For runtime knobs (concurrency, timeouts, selection policy) see
//! [`EvaluatorConfig`](crate::config::EvaluatorConfig) instead.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "5000";

// --- Emission model ---
// kg CO2 per unit of fuel consumed. Electric is per kWh while fuel consumed is
// computed as distance / efficiency like the liquid fuels; the mismatch is
// kept as-is until the model is revised.

/// kg CO2 per litre of gasoline.
pub const EMISSION_FACTOR_GASOLINE: f64 = 0.23;
/// kg CO2 per litre of diesel.
pub const EMISSION_FACTOR_DIESEL: f64 = 0.26;
/// kg CO2 per kWh of grid electricity.
pub const EMISSION_FACTOR_ELECTRIC: f64 = 0.10;
/// Factor applied to any fuel type not listed above.
pub const EMISSION_FACTOR_DEFAULT: f64 = 0.21;
/// Emission increase per unit of load weight (1%).
pub const LOAD_WEIGHT_EMISSION_FACTOR: f64 = 0.01;

// --- Composite score weights ---

/// Air-quality term is `AQI_SCORE_BASELINE - aqi` per sample point.
pub const AQI_SCORE_BASELINE: f64 = 100.0;
/// Multiplier for the current/free-flow speed ratio per sample point.
pub const SPEED_RATIO_SCORE_WEIGHT: f64 = 100.0;
/// Penalty per kg of estimated CO2.
pub const CARBON_PENALTY_PER_KG: f64 = 10.0;
/// Penalty per metre of route distance.
pub const DISTANCE_PENALTY_PER_METER: f64 = 0.1;
/// Route duration (seconds) is divided by this before being subtracted.
pub const DURATION_PENALTY_DIVISOR: f64 = 60.0;

// --- Summary bands ---

/// Average speed ratio at or above which traffic is reported as light.
pub const TRAFFIC_LIGHT_MIN_RATIO: f64 = 0.8;
/// Average speed ratio at or above which traffic is reported as moderate.
pub const TRAFFIC_MODERATE_MIN_RATIO: f64 = 0.5;

// --- Evaluator defaults (used when EVAL_* env vars are absent) ---

/// Representative points sampled per candidate route.
pub const DEFAULT_SAMPLE_POINTS: usize = 5;
/// Sample points of one route fetched concurrently.
pub const DEFAULT_POINT_CONCURRENCY: usize = 5;
/// Candidate routes enriched concurrently.
pub const DEFAULT_ROUTE_CONCURRENCY: usize = 3;
/// Upper bound on a single traffic or air-quality fetch.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;
/// Upper bound on all external fetches of one evaluation request.
pub const DEFAULT_REQUEST_DEADLINE_MS: u64 = 20_000;
/// Retries for a transient fetch failure (0 = single attempt).
pub const DEFAULT_FETCH_MAX_RETRIES: usize = 1;
/// Base backoff, doubled on every retry.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 200;

// --- Upstream HTTP statuses treated as transient ---

/// Rate limited by the provider.
pub const HTTP_TOO_MANY_REQUESTS: u16 = 429;
