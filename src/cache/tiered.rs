//! Tiered Cache Module
//!
//! Composes the in-process tier in front of the durable tier in front of an
//! arbitrary async producer.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::cache::{CacheStats, DurableCache, MemoryCache};
use crate::storage::DurableStore;

type KeyLocks = StdMutex<HashMap<String, Arc<Mutex<()>>>>;

// == In-Flight Slot ==
/// A caller's claim on a per-key lock. Dropping it (including on
/// cancellation) removes the map entry once nobody else holds the lock.
struct InFlight<'a> {
    locks: &'a KeyLocks,
    key: &'a str,
    lock: Arc<Mutex<()>>,
}

impl<'a> InFlight<'a> {
    fn join(locks: &'a KeyLocks, key: &'a str) -> Self {
        let mut map = locks.lock().unwrap_or_else(PoisonError::into_inner);
        let lock = Arc::clone(map.entry(key.to_string()).or_default());
        Self { locks, key, lock }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Map's reference plus ours: nobody else is waiting
        if Arc::strong_count(&self.lock) <= 2 {
            map.remove(self.key);
        }
    }
}

// == Tiered Cache ==
/// Memory tier, then durable tier, then the caller's fetch function.
pub struct TieredCache<T, S> {
    memory: Arc<RwLock<MemoryCache<T>>>,
    durable: Mutex<DurableCache<T, S>>,
    /// Per-key locks, present only when single-flight is enabled
    in_flight: Option<KeyLocks>,
}

impl<T, S> TieredCache<T, S>
where
    T: Clone + Serialize + DeserializeOwned,
    S: DurableStore,
{
    // == Constructor ==
    pub fn new(memory: MemoryCache<T>, durable: DurableCache<T, S>) -> Self {
        Self {
            memory: Arc::new(RwLock::new(memory)),
            durable: Mutex::new(durable),
            in_flight: None,
        }
    }

    /// Enables or disables single-flight de-duplication of concurrent misses.
    ///
    /// When enabled, concurrent `cached_call`s for one key run one at a time,
    /// so only the first of them reaches `fetch`.
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.in_flight = enabled.then(|| StdMutex::new(HashMap::new()));
        self
    }

    /// Shared handle to the in-process tier, used by the sweep task.
    pub fn memory(&self) -> Arc<RwLock<MemoryCache<T>>> {
        Arc::clone(&self.memory)
    }

    // == Cached Call ==
    /// Returns the cached value for `key`, fetching and caching it on a miss.
    ///
    /// 1. in-process hit: returned with no I/O
    /// 2. durable hit: in-process tier backfilled with `ttl`, capped at the
    ///    time the durable entry has left, then returned
    /// 3. otherwise `fetch` runs; `Ok` is stored in both tiers with `ttl`,
    ///    `Err` is returned unchanged and nothing is cached
    pub async fn cached_call<F, Fut, E>(
        &self,
        key: &str,
        fetch: F,
        ttl: Option<Duration>,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Some(in_flight) = &self.in_flight else {
            return self.lookup_or_fetch(key, fetch, ttl).await;
        };

        let slot = InFlight::join(in_flight, key);
        let _guard = slot.lock.lock().await;
        self.lookup_or_fetch(key, fetch, ttl).await
    }

    async fn lookup_or_fetch<F, Fut, E>(
        &self,
        key: &str,
        fetch: F,
        ttl: Option<Duration>,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.lookup(key, ttl).await {
            return Ok(value);
        }

        debug!(key = %key, "Cache miss in both tiers, fetching");
        let value = fetch().await?;
        self.set(key, value.clone(), ttl).await;
        Ok(value)
    }

    // == Get ==
    /// Looks a key up in both tiers without fetching.
    ///
    /// A durable hit backfills the in-process tier for the time the durable
    /// entry has left, capped at the in-process default TTL.
    pub async fn get(&self, key: &str) -> Option<T> {
        self.lookup(key, None).await
    }

    async fn lookup(&self, key: &str, ttl: Option<Duration>) -> Option<T> {
        if let Some(value) = self.memory.write().await.get(key) {
            debug!(key = %key, "In-process cache hit");
            return Some(value);
        }

        let (value, remaining) = self.durable.lock().await.get_with_ttl(key)?;
        debug!(key = %key, ?remaining, "Durable cache hit, backfilling in-process tier");
        let mut memory = self.memory.write().await;
        let ttl = ttl.unwrap_or_else(|| memory.default_ttl()).min(remaining);
        memory.set(key, value.clone(), Some(ttl));
        Some(value)
    }

    // == Has ==
    pub async fn has(&self, key: &str) -> bool {
        if self.memory.write().await.has(key) {
            return true;
        }
        self.durable.lock().await.has(key)
    }

    // == Set ==
    /// Stores a value in both tiers.
    pub async fn set(&self, key: &str, value: T, ttl: Option<Duration>) {
        self.durable.lock().await.set(key, value.clone(), ttl);
        self.memory.write().await.set(key, value, ttl);
    }

    // == Delete ==
    /// Removes a key from both tiers. Returns whether either held it.
    pub async fn delete(&self, key: &str) -> bool {
        let from_memory = self.memory.write().await.delete(key);
        let from_durable = self.durable.lock().await.delete(key);
        from_memory || from_durable
    }

    // == Clear ==
    pub async fn clear(&self) {
        self.memory.write().await.clear();
        self.durable.lock().await.clear();
    }

    // == Cleanup ==
    /// Sweeps both tiers once. Returns the total number of entries removed.
    pub async fn cleanup(&self) -> usize {
        let memory = self.memory.write().await.cleanup();
        let durable = self.durable.lock().await.cleanup();
        memory + durable
    }

    /// Snapshot of the in-process tier.
    pub async fn memory_stats(&self) -> CacheStats {
        self.memory.read().await.stats()
    }
}
