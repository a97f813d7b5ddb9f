//! Recurring token cleanup.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::store::DynTokenStore;

/// Calls [`crate::TokenStore::cleanup`] on a fixed interval until shut down.
///
/// The first pass runs immediately. Cleanup failures are logged by the store
/// and do not stop the loop.
pub struct CleanupScheduler {
    store: DynTokenStore,
    interval: Duration,
}

impl CleanupScheduler {
    /// A zero interval is raised to one millisecond.
    pub fn new(store: DynTokenStore, interval: Duration) -> Self {
        Self {
            store,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs until `shutdown` becomes `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_ms = self.interval.as_millis() as u64,
            "Token cleanup scheduler started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    debug!("Running scheduled token cleanup");
                    self.store.cleanup().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("Token cleanup scheduler stopped");
    }

    /// Spawns [`run`](Self::run) onto the current tokio runtime.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::TokenStoreResult;
    use crate::store::TokenStore;
    use crate::token::Token;

    #[derive(Default)]
    struct CountingStore {
        cleanups: AtomicUsize,
    }

    #[async_trait]
    impl TokenStore for CountingStore {
        async fn save(&self, _token: &Token) -> TokenStoreResult<()> {
            Ok(())
        }

        async fn delete(&self, _token: &str) -> TokenStoreResult<()> {
            Ok(())
        }

        async fn get_by_token(&self, token: &str) -> TokenStoreResult<Token> {
            Err(crate::TokenStoreError::not_found(token))
        }

        async fn get_all_tokens_by_type(&self, _token_type: &str) -> TokenStoreResult<Vec<Token>> {
            Ok(Vec::new())
        }

        async fn remove_all_tokens_by_type(&self, _token_type: &str) -> TokenStoreResult<()> {
            Ok(())
        }

        async fn cleanup(&self) {
            self.cleanups.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_runs_cleanup_until_shutdown() {
        let store = Arc::new(CountingStore::default());
        let (tx, rx) = watch::channel(false);

        let handle =
            CleanupScheduler::new(store.clone(), Duration::from_millis(10)).spawn(rx);

        tokio::time::sleep(Duration::from_millis(60)).await;
        tx.send(true).expect("scheduler alive");
        handle.await.expect("scheduler task");

        let runs = store.cleanups.load(Ordering::SeqCst);
        assert!(runs >= 2, "expected several cleanup passes, got {runs}");

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(store.cleanups.load(Ordering::SeqCst), runs);
    }

    #[tokio::test]
    async fn test_stops_when_sender_dropped() {
        let store = Arc::new(CountingStore::default());
        let (tx, rx) = watch::channel(false);

        let handle = CleanupScheduler::new(store.clone(), Duration::from_secs(3600)).spawn(rx);
        drop(tx);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler stopped")
            .expect("scheduler task");
    }

    #[tokio::test]
    async fn test_already_shut_down_does_nothing() {
        let store = Arc::new(CountingStore::default());
        let (_tx, rx) = watch::channel(true);

        CleanupScheduler::new(store.clone(), Duration::from_millis(10))
            .run(rx)
            .await;

        assert_eq!(store.cleanups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let store = Arc::new(CountingStore::default());
        let scheduler = CleanupScheduler::new(store, Duration::ZERO);
        assert_eq!(scheduler.interval(), Duration::from_millis(1));
    }
}
