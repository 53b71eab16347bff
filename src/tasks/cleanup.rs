//! TTL Cleanup Task
//!
//! Background task that periodically removes expired in-process entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryCache;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task sleeps for `interval`, takes the write lock and calls
/// [`MemoryCache::cleanup`], forever. The caller owns the returned handle and
/// aborts it on shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(MemoryCache::<String>::default()));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), DEFAULT_CLEANUP_INTERVAL);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<T>(cache: Arc<RwLock<MemoryCache<T>>>, interval: Duration) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!("Starting TTL cleanup task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.write().await.cleanup();

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
