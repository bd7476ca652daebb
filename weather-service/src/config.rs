use std::env;
use std::time::Duration;

pub struct Config {
    pub port: u16,
    pub openweather_url: String,
    pub openweather_api_key: String,
    pub cache_ttl_seconds: u64,
    pub sweep_interval_seconds: u64,
    pub request_timeout_seconds: u64,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT").unwrap_or(3002),
            openweather_url: env::var("OPENWEATHER_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org".to_string()),
            openweather_api_key: env::var("OPENWEATHER_API_KEY").unwrap_or_default(),
            cache_ttl_seconds: env_parse("CACHE_TTL_SECONDS").unwrap_or(1800), // 30 minutes
            sweep_interval_seconds: env_parse("SWEEP_INTERVAL_SECONDS").unwrap_or(1800),
            request_timeout_seconds: env_parse("REQUEST_TIMEOUT_SECONDS").unwrap_or(10),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    // A zero period would make the sweeper spin.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds.max(1))
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
