use crate::forecast::{format_conditions, parse_conditions};
use crate::validator::Location;
use common::errors::AppError;
use common::http_client::HttpClient;
use common::models::CurrentConditions;
use tracing::{info, instrument, warn};

const WEATHER_PATH: &str = "/data/2.5/weather";

/// Client for the OpenWeatherMap "current weather" endpoint
pub struct OpenWeatherClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(http_client: HttpClient, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
            api_key: api_key.into(),
        }
    }

    pub fn weather_url(&self, location: &Location) -> String {
        format!(
            "{}{}?q={}&appid={}&units=metric",
            self.base_url,
            WEATHER_PATH,
            urlencoding::encode(location.as_str()),
            urlencoding::encode(&self.api_key)
        )
    }

    #[instrument(skip(self), fields(location = %location))]
    pub async fn fetch_conditions(&self, location: &Location) -> Result<CurrentConditions, AppError> {
        info!("Fetching weather from provider");

        let body = self.http_client.get_text(&self.weather_url(location)).await?;

        parse_conditions(&body).inspect_err(|e| {
            warn!(error = %e, "Provider response did not match expected shape");
        })
    }

    pub async fn fetch_and_format(&self, location: &Location) -> Result<String, AppError> {
        let conditions = self.fetch_conditions(location).await?;
        Ok(format_conditions(&conditions))
    }
}
