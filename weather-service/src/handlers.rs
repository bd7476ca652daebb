use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use common::errors::AppError;
use common::models::{ForecastResponse, HealthResponse, LookupResponse};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::IntoParams;

use crate::service::{Source, WeatherService};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WeatherService>,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "weather-service".to_string(),
        cached_entries: state.service.cached_entries().await,
    })
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LookupQuery {
    /// City, state, province, or 5-digit zip code
    #[serde(default)]
    pub location: String,
}

#[utoipa::path(
    get,
    path = "/api/weather",
    params(LookupQuery),
    responses(
        (status = 200, description = "Display text, including error messages", body = LookupResponse)
    ),
    tag = "weather"
)]
pub async fn lookup(
    State(state): State<AppState>,
    Query(params): Query<LookupQuery>,
) -> Json<LookupResponse> {
    info!(location = %params.location, "Lookup request received");

    let message = state.service.lookup(&params.location).await;

    Json(LookupResponse { message })
}

#[utoipa::path(
    get,
    path = "/api/weather/{location}",
    params(
        ("location" = String, Path, description = "City, state, province, or 5-digit zip code")
    ),
    responses(
        (status = 200, description = "Current conditions for the location", body = ForecastResponse),
        (status = 400, description = "Invalid location"),
        (status = 404, description = "Provider does not know the location"),
        (status = 502, description = "Provider or network failure"),
        (status = 504, description = "Provider timed out")
    ),
    tag = "weather"
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> Result<Json<ForecastResponse>, AppError> {
    info!(location = %location, "Forecast request received");

    let lookup = state.service.lookup_outcome(&location).await?;

    Ok(Json(ForecastResponse {
        location: lookup.location.to_string(),
        forecast: lookup.forecast,
        cached: lookup.source == Source::Cache,
        fetched_at: lookup.fetched_at.to_rfc3339(),
    }))
}
