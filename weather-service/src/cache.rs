use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

/// A cached forecast as returned by `WeatherCache::touch`
#[derive(Debug, Clone, PartialEq)]
pub struct CachedForecast {
    pub forecast: String,
    pub fetched_at: DateTime<Utc>,
}

struct CacheEntry {
    forecast: String,
    fetched_at: DateTime<Utc>,
    last_accessed: Instant,
}

/// Forecast cache with an idle TTL: every hit pushes the expiry back.
///
/// Entries are only removed by `purge_expired`, so an idle entry may linger
/// until the next sweep.
pub struct WeatherCache {
    cache: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl WeatherCache {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Return the entry for `key` and mark it accessed at `now`.
    pub async fn touch(&self, key: &str, now: Instant) -> Option<CachedForecast> {
        let mut cache = self.cache.write().await;
        let entry = cache.get_mut(key)?;
        entry.last_accessed = now;
        Some(CachedForecast {
            forecast: entry.forecast.clone(),
            fetched_at: entry.fetched_at,
        })
    }

    pub async fn insert(&self, key: String, forecast: String, fetched_at: DateTime<Utc>, now: Instant) {
        let mut cache = self.cache.write().await;
        cache.insert(
            key,
            CacheEntry {
                forecast,
                fetched_at,
                last_accessed: now,
            },
        );
    }

    /// Drop every entry idle for at least the TTL as of `now`. Returns how many were removed.
    pub async fn purge_expired(&self, now: Instant) -> usize {
        let mut cache = self.cache.write().await;
        let before = cache.len();
        let ttl = self.ttl;
        cache.retain(|_, entry| now.saturating_duration_since(entry.last_accessed) < ttl);
        before - cache.len()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.cache.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }
}
