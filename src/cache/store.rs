//! Cache Store Module
//!
//! In-process cache tier: HashMap storage with per-entry TTL, lazy deletion on
//! read and an explicit sweep.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock, DEFAULT_TTL};

// == Memory Cache ==
/// In-process expiring cache typed to one payload shape.
///
/// Unbounded in count; entries leave only by expiry, `delete` or `clear`.
#[derive(Debug)]
pub struct MemoryCache<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// TTL applied when `set` is called without one
    default_ttl: Duration,
    /// Time source
    clock: Arc<dyn Clock>,
}

impl<T: Clone> MemoryCache<T> {
    // == Constructor ==
    /// Creates an empty cache using the system clock.
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
            clock,
        }
    }

    // == Set ==
    /// Stores a value, overwriting any previous entry and resetting its TTL.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL (uses the default TTL if None)
    pub fn set(&mut self, key: impl Into<String>, value: T, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl);
        self.entries.insert(key.into(), entry);
    }

    // == Get ==
    /// Returns a clone of the value if present and live.
    ///
    /// An expired entry is removed before `None` is returned.
    pub fn get(&mut self, key: &str) -> Option<T> {
        if self.evict_if_expired(key) {
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Has ==
    /// Same liveness check as `get`, without cloning the value.
    pub fn has(&mut self, key: &str) -> bool {
        !self.evict_if_expired(key) && self.entries.contains_key(key)
    }

    // == Delete ==
    /// Removes an entry. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries in a single pass.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    // == Stats ==
    /// Returns a snapshot without removing anything.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now_ms();
        let expired = self
            .entries
            .values()
            .filter(|entry| entry.is_expired_at(now))
            .count();

        CacheStats {
            size: self.entries.len(),
            expired,
            keys: self.entries.keys().cloned().collect(),
        }
    }

    // == Length ==
    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Drops `key` if it is expired. Returns true when it was dropped.
    fn evict_if_expired(&mut self, key: &str) -> bool {
        let now = self.clock.now_ms();
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now));

        if expired {
            self.entries.remove(key);
        }
        expired
    }
}

impl<T: Clone> Default for MemoryCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn clocked(ttl_ms: u64) -> (MemoryCache<String>, ManualClock) {
        let clock = ManualClock::new(0);
        let cache = MemoryCache::with_clock(Duration::from_millis(ttl_ms), Arc::new(clock.clone()));
        (cache, clock)
    }

    #[test]
    fn test_store_new() {
        let store: MemoryCache<String> = MemoryCache::default();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.default_ttl(), DEFAULT_TTL);
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = clocked(1_000);

        store.set("key1", "value1".to_string(), None);

        assert_eq!(store.get("key1").as_deref(), Some("value1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (mut store, _) = clocked(1_000);
        assert!(store.get("nonexistent").is_none());
        assert!(!store.has("nonexistent"));
    }

    #[test]
    fn test_example_scenario() {
        let clock = ManualClock::new(0);
        let mut store = MemoryCache::with_clock(Duration::from_millis(1_000), Arc::new(clock.clone()));

        store.set("p", serde_json::json!({"id": 1}), None);

        clock.set(500);
        assert_eq!(store.get("p"), Some(serde_json::json!({"id": 1})));

        clock.set(1_500);
        assert!(store.get("p").is_none());
        assert_eq!(store.stats().size, 0);
    }

    #[test]
    fn test_explicit_ttl_overrides_default() {
        let (mut store, clock) = clocked(1_000);

        store.set("long", "v".to_string(), Some(Duration::from_secs(60)));
        clock.advance(5_000);

        assert!(store.has("long"));
    }

    #[test]
    fn test_has_lazily_deletes_expired() {
        let (mut store, clock) = clocked(100);

        store.set("key1", "value1".to_string(), None);
        clock.advance(100);

        assert_eq!(store.stats().size, 1);
        assert!(!store.has("key1"));
        assert_eq!(store.stats().size, 0);
    }

    #[test]
    fn test_store_delete() {
        let (mut store, _) = clocked(1_000);

        store.set("key1", "value1".to_string(), None);

        assert!(store.delete("key1"));
        assert!(store.is_empty());
        assert!(store.get("key1").is_none());
    }

    #[test]
    fn test_store_delete_nonexistent() {
        let (mut store, _) = clocked(1_000);
        assert!(!store.delete("nonexistent"));
    }

    #[test]
    fn test_store_overwrite() {
        let (mut store, _) = clocked(1_000);

        store.set("key1", "value1".to_string(), None);
        store.set("key1", "value2".to_string(), None);

        assert_eq!(store.get("key1").as_deref(), Some("value2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_overwrite_resets_ttl() {
        let (mut store, clock) = clocked(1_000);

        store.set("key1", "a".to_string(), None);
        clock.advance(800);
        store.set("key1", "b".to_string(), None);
        clock.advance(800);

        assert_eq!(store.get("key1").as_deref(), Some("b"));
    }

    #[test]
    fn test_store_clear() {
        let (mut store, _) = clocked(1_000);

        store.set("a", "1".to_string(), None);
        store.set("b", "2".to_string(), None);
        store.clear();

        assert!(store.is_empty());
    }

    #[test]
    fn test_store_cleanup_expired() {
        let (mut store, clock) = clocked(1_000);

        store.set("key1", "value1".to_string(), Some(Duration::from_millis(100)));
        store.set("key2", "value2".to_string(), Some(Duration::from_secs(10)));
        clock.advance(200);

        let removed = store.cleanup();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("key2").is_some());
    }

    #[test]
    fn test_stats_does_not_mutate() {
        let (mut store, clock) = clocked(100);

        store.set("old", "x".to_string(), None);
        store.set("new", "y".to_string(), Some(Duration::from_secs(10)));
        clock.advance(150);

        let stats = store.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.keys.len(), 2);
        assert!(stats.keys.contains(&"old".to_string()));

        // Unchanged until a read or a sweep
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_real_clock_expiry() {
        let mut store: MemoryCache<u8> = MemoryCache::new(Duration::from_millis(20));

        store.set("k", 1, None);
        assert_eq!(store.get("k"), Some(1));

        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(store.get("k"), None);
    }
}
