use crate::api_client::OpenWeatherClient;
use crate::cache::WeatherCache;
use crate::sweeper::ExpirySweeper;
use crate::validator::Location;
use chrono::{DateTime, Utc};
use common::errors::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

pub const CACHE_MARKER: &str = "(Cache)\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Provider,
}

/// Successful lookup
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub location: Location,
    pub forecast: String,
    pub source: Source,
    pub fetched_at: DateTime<Utc>,
}

impl Lookup {
    /// Display text; cache hits are prefixed with `(Cache)` on its own line.
    pub fn into_display(self) -> String {
        match self.source {
            Source::Cache => format!("{}{}", CACHE_MARKER, self.forecast),
            Source::Provider => self.forecast,
        }
    }
}

type FetchResult = Result<(String, DateTime<Utc>), AppError>;

/// Weather lookups backed by an idle-TTL cache.
///
/// Concurrent misses for one location share a single provider request.
pub struct WeatherService {
    client: Arc<OpenWeatherClient>,
    cache: Arc<WeatherCache>,
    in_flight: Mutex<HashMap<String, Arc<OnceCell<FetchResult>>>>,
}

impl WeatherService {
    pub fn new(client: OpenWeatherClient, ttl: Duration) -> Self {
        Self {
            client: Arc::new(client),
            cache: Arc::new(WeatherCache::with_ttl(ttl)),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Display-ready result for `input`. Never fails; errors come back as text.
    pub async fn lookup(&self, input: &str) -> String {
        match self.lookup_outcome(input).await {
            Ok(lookup) => lookup.into_display(),
            Err(e) => e.user_message(),
        }
    }

    #[instrument(skip(self), fields(location = %input.trim_ascii()))]
    pub async fn lookup_outcome(&self, input: &str) -> Result<Lookup, AppError> {
        let location = Location::parse(input).inspect_err(|_| {
            debug!("Rejected location");
        })?;
        let now = Instant::now();

        if let Some(hit) = self.cache.touch(location.as_str(), now).await {
            info!("Cache hit");
            return Ok(Lookup {
                location,
                forecast: hit.forecast,
                source: Source::Cache,
                fetched_at: hit.fetched_at,
            });
        }

        info!("Cache miss");
        let (forecast, fetched_at) = self.fetch_shared(&location, now).await?;

        Ok(Lookup {
            location,
            forecast,
            source: Source::Provider,
            fetched_at,
        })
    }

    /// Join the in-flight fetch for `location`, or start one.
    ///
    /// The fetching future unregisters its cell before the cell is filled, so
    /// a registered cell never holds a result, even when callers are dropped.
    async fn fetch_shared(&self, location: &Location, now: Instant) -> FetchResult {
        let key = location.as_str();
        let cell = {
            let mut in_flight = self.in_flight.lock().await;
            let cell = in_flight
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()));
            if cell.initialized() {
                *cell = Arc::new(OnceCell::new());
            }
            cell.clone()
        };

        let client = &self.client;
        let cache = &self.cache;
        let in_flight = &self.in_flight;
        let registered = &cell;
        cell.get_or_init(|| async move {
            let result = client
                .fetch_and_format(location)
                .await
                .map(|forecast| (forecast, Utc::now()));

            match &result {
                Ok((forecast, fetched_at)) => {
                    cache
                        .insert(key.to_string(), forecast.clone(), *fetched_at, now)
                        .await;
                }
                Err(e) => warn!(error = %e, "Weather fetch failed"),
            }

            let mut in_flight = in_flight.lock().await;
            if in_flight
                .get(key)
                .is_some_and(|current| Arc::ptr_eq(current, registered))
            {
                in_flight.remove(key);
            }
            result
        })
        .await
        .clone()
    }

    /// Start the periodic expiry task. Cancelling `shutdown` stops it too.
    pub fn start_sweeper(&self, period: Duration, shutdown: CancellationToken) -> ExpirySweeper {
        ExpirySweeper::spawn(self.cache.clone(), period, shutdown.child_token())
    }

    pub async fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now()).await
    }

    /// Sweep as if the clock read `now`.
    pub async fn sweep_expired_at(&self, now: Instant) -> usize {
        self.cache.purge_expired(now).await
    }

    pub async fn is_cached(&self, input: &str) -> bool {
        match Location::parse(input) {
            Ok(location) => self.cache.contains(location.as_str()).await,
            Err(_) => false,
        }
    }

    pub async fn cached_entries(&self) -> usize {
        self.cache.len().await
    }
}
