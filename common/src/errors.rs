use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub const INVALID_LOCATION_MESSAGE: &str =
    "Error: Please enter a valid city, state, province, or zip code.";
pub const FETCH_FAILED_MESSAGE: &str = "Error: Unable to fetch weather data";
pub const FALLBACK_MESSAGE: &str = "Failed to retrieve weather data.";

/// Failure reasons for a weather lookup.
///
/// Cloneable so a single in-flight fetch can hand the same outcome to every
/// caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Invalid location")]
    InvalidLocation,

    #[error("Provider returned HTTP {status}")]
    ProviderUnavailable { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl AppError {
    pub fn provider_unavailable(status: u16) -> Self {
        Self::ProviderUnavailable { status }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Human-readable text shown to the end user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidLocation => INVALID_LOCATION_MESSAGE.to_string(),
            AppError::ProviderUnavailable { .. } | AppError::MalformedResponse(_) => {
                FETCH_FAILED_MESSAGE.to_string()
            }
            AppError::Network(cause) | AppError::Timeout(cause) => format!("Error: {}", cause),
            AppError::Internal(_) => FALLBACK_MESSAGE.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidLocation => StatusCode::BAD_REQUEST,
            AppError::ProviderUnavailable { status: 404 } => StatusCode::NOT_FOUND,
            AppError::ProviderUnavailable { .. } => StatusCode::BAD_GATEWAY,
            AppError::Network(_) => StatusCode::BAD_GATEWAY,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// The provider URL carries the API key, so it never reaches error text.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.to_string(),
            message: self.user_message(),
        });

        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_match_display_contract() {
        assert_eq!(
            AppError::InvalidLocation.user_message(),
            INVALID_LOCATION_MESSAGE
        );
        assert_eq!(
            AppError::provider_unavailable(404).user_message(),
            FETCH_FAILED_MESSAGE
        );
        assert_eq!(
            AppError::malformed("missing field `main`").user_message(),
            FETCH_FAILED_MESSAGE
        );
        assert_eq!(
            AppError::Network("connection refused".into()).user_message(),
            "Error: connection refused"
        );
        assert_eq!(
            AppError::internal("fetch task dropped").user_message(),
            FALLBACK_MESSAGE
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            AppError::InvalidLocation.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::provider_unavailable(404).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::provider_unavailable(401).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::timeout("slow").status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn json_errors_become_malformed_response() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(AppError::from(err), AppError::MalformedResponse(_)));
    }
}
