//! Durable Cache Module
//!
//! Persisted cache tier. Entries are serialized as JSON into a
//! [`DurableStore`] under `prefix + key`; expiry is checked lazily on read.
//! Storage and parse failures are logged and never reach the caller.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, Clock, SystemClock, DEFAULT_DURABLE_TTL, DEFAULT_PREFIX};
use crate::storage::DurableStore;

/// Outcome of reading one namespaced key.
enum Lookup<T> {
    /// Value and its remaining time to live
    Live(T, Duration),
    Missing,
    /// Entry was expired or corrupt and has been removed
    Dropped,
}

// == Durable Cache ==
/// Expiring cache persisted to a string-keyed store.
#[derive(Debug)]
pub struct DurableCache<T, S> {
    store: S,
    prefix: String,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
    _payload: PhantomData<fn() -> T>,
}

impl<T, S> DurableCache<T, S>
where
    T: Serialize + DeserializeOwned,
    S: DurableStore,
{
    // == Constructors ==
    /// Creates a cache with the default prefix and 24 hour TTL.
    pub fn new(store: S) -> Self {
        Self::with_options(store, DEFAULT_PREFIX, DEFAULT_DURABLE_TTL)
    }

    pub fn with_options(store: S, prefix: impl Into<String>, default_ttl: Duration) -> Self {
        Self::with_clock(store, prefix, default_ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: S,
        prefix: impl Into<String>,
        default_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            default_ttl,
            clock,
            _payload: PhantomData,
        }
    }

    // == Set ==
    /// Persists a value. Failures are logged and the call is a no-op.
    ///
    /// When a write fails, any older entry under the same key is dropped so a
    /// later `get` cannot serve a stale value.
    pub fn set(&mut self, key: &str, value: T, ttl: Option<Duration>) {
        let full_key = self.full_key(key);
        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl.unwrap_or(self.default_ttl));

        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %key, "Failed to serialize durable cache entry: {}", e);
                self.discard(&full_key);
                return;
            }
        };

        if let Err(e) = self.store.set_item(&full_key, &raw) {
            warn!(key = %key, "Failed to write durable cache entry: {}", e);
            self.discard(&full_key);
        }
    }

    // == Get ==
    /// Returns the value if present, parsable and live.
    pub fn get(&mut self, key: &str) -> Option<T> {
        self.get_with_ttl(key).map(|(value, _)| value)
    }

    /// Like [`get`](Self::get), also returning how long the entry has left.
    pub fn get_with_ttl(&mut self, key: &str) -> Option<(T, Duration)> {
        let full_key = self.full_key(key);
        match self.lookup(&full_key) {
            Lookup::Live(value, remaining) => Some((value, remaining)),
            Lookup::Missing | Lookup::Dropped => None,
        }
    }

    // == Has ==
    pub fn has(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    // == Delete ==
    /// Removes an entry. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let full_key = self.full_key(key);
        match self.store.remove_item(&full_key) {
            Ok(removed) => removed,
            Err(e) => {
                warn!(key = %key, "Failed to delete durable cache entry: {}", e);
                false
            }
        }
    }

    // == Clear ==
    /// Removes every key under this cache's prefix. Other keys are untouched.
    pub fn clear(&mut self) {
        for full_key in self.own_keys() {
            self.discard(&full_key);
        }
    }

    // == Cleanup ==
    /// Best-effort scan of all namespaced keys, dropping expired or corrupt
    /// entries. Returns the number removed.
    pub fn cleanup(&mut self) -> usize {
        let mut removed = 0;
        for full_key in self.own_keys() {
            if let Lookup::Dropped = self.lookup(&full_key) {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(removed, prefix = %self.prefix, "Durable cleanup removed entries");
        }
        removed
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Shared access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn own_keys(&self) -> Vec<String> {
        match self.store.keys() {
            Ok(keys) => keys
                .into_iter()
                .filter(|k| k.starts_with(&self.prefix))
                .collect(),
            Err(e) => {
                warn!(prefix = %self.prefix, "Failed to list durable cache keys: {}", e);
                Vec::new()
            }
        }
    }

    fn lookup(&mut self, full_key: &str) -> Lookup<T> {
        let raw = match self.store.get_item(full_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Lookup::Missing,
            Err(e) => {
                warn!(key = %full_key, "Failed to read durable cache entry: {}", e);
                return Lookup::Missing;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = %full_key, "Corrupt durable cache entry, removing: {}", e);
                self.discard(full_key);
                return Lookup::Dropped;
            }
        };

        let now = self.clock.now_ms();
        if entry.is_expired_at(now) {
            self.discard(full_key);
            return Lookup::Dropped;
        }

        let remaining = Duration::from_millis(entry.ttl_remaining_ms(now));
        Lookup::Live(entry.value, remaining)
    }

    fn discard(&mut self, full_key: &str) {
        if let Err(e) = self.store.remove_item(full_key) {
            warn!(key = %full_key, "Failed to remove durable cache entry: {}", e);
        }
    }
}
