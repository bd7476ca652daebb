use crate::cache::WeatherCache;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

/// Background task purging idle cache entries on a fixed period.
///
/// The first sweep happens one full period after spawning.
pub struct ExpirySweeper {
    handle: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl ExpirySweeper {
    pub fn spawn(cache: Arc<WeatherCache>, period: Duration, cancellation_token: CancellationToken) -> Self {
        let token = cancellation_token.clone();
        let handle = tokio::spawn(
            async move {
                let mut interval = time::interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

                info!(period_secs = period.as_secs(), "Expiry sweeper started");

                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = interval.tick() => {
                            let purged = cache.purge_expired(Instant::now()).await;
                            if purged > 0 {
                                info!(purged, "Purged expired cache entries");
                            } else {
                                debug!("No expired cache entries");
                            }
                        }
                    }
                }

                info!("Expiry sweeper stopped");
            }
            .instrument(info_span!("expiry_sweeper")),
        );

        Self {
            handle,
            cancellation_token,
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Cancel the task and wait for it to exit.
    pub async fn shutdown(self) {
        self.cancellation_token.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Expiry sweeper task ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const PERIOD: Duration = Duration::from_secs(30 * 60);

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_sweep_waits_a_full_period() {
        let cache = Arc::new(WeatherCache::with_ttl(PERIOD));
        cache
            .insert("Paris".to_string(), "rain".to_string(), Utc::now(), Instant::now())
            .await;

        let sweeper = ExpirySweeper::spawn(cache.clone(), PERIOD, CancellationToken::new());
        settle().await;

        time::advance(Duration::from_secs(29 * 60)).await;
        settle().await;
        assert!(cache.contains("Paris").await);

        time::advance(Duration::from_secs(60)).await;
        settle().await;
        assert!(!cache.contains("Paris").await);

        sweeper.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn recently_touched_entry_survives_a_sweep() {
        let cache = Arc::new(WeatherCache::with_ttl(PERIOD));
        cache
            .insert("Oslo".to_string(), "snow".to_string(), Utc::now(), Instant::now())
            .await;

        let sweeper = ExpirySweeper::spawn(cache.clone(), PERIOD, CancellationToken::new());
        settle().await;

        time::advance(Duration::from_secs(10 * 60)).await;
        cache.touch("Oslo", Instant::now()).await;

        time::advance(Duration::from_secs(21 * 60)).await;
        settle().await;
        assert!(cache.contains("Oslo").await);

        sweeper.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_cancelled() {
        let cache = Arc::new(WeatherCache::with_ttl(PERIOD));
        let token = CancellationToken::new();
        let sweeper = ExpirySweeper::spawn(cache, PERIOD, token.child_token());
        settle().await;
        assert!(sweeper.is_running());

        token.cancel();
        settle().await;
        assert!(!sweeper.is_running());
        sweeper.shutdown().await;
    }
}
