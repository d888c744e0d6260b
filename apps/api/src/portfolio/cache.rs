//! Process-wide public-page cache invalidation.
//!
//! Every successful portfolio write bumps a generation counter on a watch
//! channel. The public page renderer holds a receiver and treats any bump as
//! "portfolio pages are stale" — coarse-grained on purpose, the row count is
//! small enough that per-username granularity buys nothing.

use std::sync::Arc;

use tokio::sync::watch;

#[derive(Clone)]
pub struct CacheStamp {
    tx: Arc<watch::Sender<u64>>,
}

impl CacheStamp {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Marks all cached portfolio pages stale.
    pub fn invalidate(&self) {
        self.tx.send_modify(|generation| *generation += 1);
        tracing::debug!("portfolio cache invalidated (generation {})", self.generation());
    }

    /// Subscribes to invalidation events. Receivers observe the latest
    /// generation; intermediate bumps may be coalesced.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }

    pub fn generation(&self) -> u64 {
        *self.tx.borrow()
    }
}

impl Default for CacheStamp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidate_bumps_generation() {
        let stamp = CacheStamp::new();
        assert_eq!(stamp.generation(), 0);
        stamp.invalidate();
        stamp.invalidate();
        assert_eq!(stamp.generation(), 2);
    }

    #[tokio::test]
    async fn test_subscriber_observes_invalidation() {
        let stamp = CacheStamp::new();
        let mut rx = stamp.subscribe();
        stamp.invalidate();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 1);
    }

    #[test]
    fn test_clones_share_one_counter() {
        let stamp = CacheStamp::new();
        let other = stamp.clone();
        other.invalidate();
        assert_eq!(stamp.generation(), 1);
    }
}
