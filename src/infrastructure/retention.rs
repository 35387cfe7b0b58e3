use crate::domain::ports::CollectStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Spawns the periodic purge of expired collect requests.
///
/// This plays the part of a database TTL index: the workflows never look at
/// expiry themselves. A failed sweep is logged and retried on the next tick.
/// Abort the returned handle to stop the sweep.
pub fn spawn_collect_retention(store: Arc<dyn CollectStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            match store.purge_expired(Utc::now()).await {
                Ok(0) => {}
                Ok(purged) => debug!(purged, "expired collect requests removed"),
                Err(e) => warn!(error = %e, "collect retention sweep failed"),
            }
        }
    })
}
