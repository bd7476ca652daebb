use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Current conditions parsed from the provider payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurrentConditions {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub description: String,
}

/// Display-string response; `message` carries errors as well
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LookupResponse {
    pub message: String,
}

/// Structured forecast for programmatic clients
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ForecastResponse {
    pub location: String,
    pub forecast: String,
    pub cached: bool,
    /// RFC 3339 time of the provider fetch that produced `forecast`
    pub fetched_at: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub cached_entries: usize,
}
