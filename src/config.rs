use crate::constants::*;
use std::env;
use std::time::Duration;

/// Which metric decides the "least traffic" slot of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeastTrafficPolicy {
    /// Highest composite score, same winner as the best-overall slot
    #[default]
    CompositeScore,
    /// Highest average current/free-flow speed ratio over sampled points
    SpeedRatio,
}

impl std::str::FromStr for LeastTrafficPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "composite" | "score" => Ok(LeastTrafficPolicy::CompositeScore),
            "speed_ratio" | "speed-ratio" => Ok(LeastTrafficPolicy::SpeedRatio),
            _ => Err(format!(
                "Invalid least traffic policy: {}. Use 'composite' or 'speed_ratio'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub tomtom_api_key: String,
    pub waqi_token: String,
    pub openweather_api_key: String,
    pub osrm_base_url: Option<String>,
    pub tomtom_base_url: Option<String>,
    pub waqi_base_url: Option<String>,
    pub openweather_base_url: Option<String>,
    pub evaluator: EvaluatorConfig,
}

#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Number of representative coordinates sampled per candidate route
    pub sample_points: usize,

    /// Sample points of a single route fetched at the same time
    pub point_concurrency: usize,

    /// Candidate routes enriched at the same time
    pub route_concurrency: usize,

    /// Upper bound on a single traffic or air-quality fetch (retries included)
    pub fetch_timeout: Duration,

    /// Upper bound on every external fetch of one request. Fetches still
    /// pending when it elapses are recorded as absent readings.
    pub request_deadline: Duration,

    /// Retries for transient provider failures
    pub fetch_max_retries: usize,

    /// Base backoff between retries, doubled per attempt
    pub retry_backoff: Duration,

    pub least_traffic_policy: LeastTrafficPolicy,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            sample_points: DEFAULT_SAMPLE_POINTS,
            point_concurrency: DEFAULT_POINT_CONCURRENCY,
            route_concurrency: DEFAULT_ROUTE_CONCURRENCY,
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            request_deadline: Duration::from_millis(DEFAULT_REQUEST_DEADLINE_MS),
            fetch_max_retries: DEFAULT_FETCH_MAX_RETRIES,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
            least_traffic_policy: LeastTrafficPolicy::default(),
        }
    }
}

impl EvaluatorConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            sample_points: env::var("EVAL_SAMPLE_POINTS")
                .unwrap_or_else(|_| defaults.sample_points.to_string())
                .parse()
                .map_err(|_| "Invalid EVAL_SAMPLE_POINTS")?,

            point_concurrency: env::var("EVAL_POINT_CONCURRENCY")
                .unwrap_or_else(|_| defaults.point_concurrency.to_string())
                .parse()
                .map_err(|_| "Invalid EVAL_POINT_CONCURRENCY")?,

            route_concurrency: env::var("EVAL_ROUTE_CONCURRENCY")
                .unwrap_or_else(|_| defaults.route_concurrency.to_string())
                .parse()
                .map_err(|_| "Invalid EVAL_ROUTE_CONCURRENCY")?,

            fetch_timeout: Duration::from_millis(
                env::var("EVAL_FETCH_TIMEOUT_MS")
                    .unwrap_or_else(|_| DEFAULT_FETCH_TIMEOUT_MS.to_string())
                    .parse()
                    .map_err(|_| "Invalid EVAL_FETCH_TIMEOUT_MS")?,
            ),

            request_deadline: Duration::from_millis(
                env::var("EVAL_REQUEST_DEADLINE_MS")
                    .unwrap_or_else(|_| DEFAULT_REQUEST_DEADLINE_MS.to_string())
                    .parse()
                    .map_err(|_| "Invalid EVAL_REQUEST_DEADLINE_MS")?,
            ),

            fetch_max_retries: env::var("EVAL_FETCH_MAX_RETRIES")
                .unwrap_or_else(|_| defaults.fetch_max_retries.to_string())
                .parse()
                .map_err(|_| "Invalid EVAL_FETCH_MAX_RETRIES")?,

            retry_backoff: Duration::from_millis(
                env::var("EVAL_RETRY_BACKOFF_MS")
                    .unwrap_or_else(|_| DEFAULT_RETRY_BACKOFF_MS.to_string())
                    .parse()
                    .map_err(|_| "Invalid EVAL_RETRY_BACKOFF_MS")?,
            ),

            least_traffic_policy: env::var("EVAL_LEAST_TRAFFIC_POLICY")
                .unwrap_or_else(|_| "composite".to_string())
                .parse()?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sample_points == 0 {
            return Err("EVAL_SAMPLE_POINTS must be at least 1".to_string());
        }
        if self.point_concurrency == 0 || self.route_concurrency == 0 {
            return Err("Evaluator concurrency limits must be at least 1".to_string());
        }
        if self.fetch_timeout.is_zero() {
            return Err("EVAL_FETCH_TIMEOUT_MS must be greater than 0".to_string());
        }
        if self.request_deadline < self.fetch_timeout {
            return Err(
                "EVAL_REQUEST_DEADLINE_MS must not be shorter than EVAL_FETCH_TIMEOUT_MS"
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            tomtom_api_key: env::var("TOMTOM_API_KEY").map_err(|_| "TOMTOM_API_KEY must be set")?,
            waqi_token: env::var("WAQI_TOKEN").map_err(|_| "WAQI_TOKEN must be set")?,
            openweather_api_key: env::var("OPENWEATHER_API_KEY")
                .map_err(|_| "OPENWEATHER_API_KEY must be set")?,
            osrm_base_url: env::var("OSRM_BASE_URL").ok(),
            tomtom_base_url: env::var("TOMTOM_BASE_URL").ok(),
            waqi_base_url: env::var("WAQI_BASE_URL").ok(),
            openweather_base_url: env::var("OPENWEATHER_BASE_URL").ok(),
            evaluator: EvaluatorConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
