use crate::errors::AppError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// HTTP client with a hard per-request timeout.
///
/// No retries: a failed request is reported once and the caller decides
/// whether to try again.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// GET `url` and return the body as text. Anything but `200 OK` is an error.
    ///
    /// `url` is kept out of the span since it may carry credentials.
    #[instrument(skip(self, url))]
    pub async fn get_text(&self, url: &str) -> Result<String, AppError> {
        let response = tokio::time::timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| {
                AppError::timeout(format!(
                    "request timed out after {}s",
                    self.timeout.as_secs()
                ))
            })??;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Provider returned non-200 status");
            return Err(AppError::provider_unavailable(status.as_u16()));
        }

        let text = response.text().await?;
        debug!(bytes = text.len(), "Response body received");

        Ok(text)
    }
}
