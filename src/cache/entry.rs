//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// Represents a single cache entry with value and expiry metadata.
///
/// The same shape is stored in memory and serialized into the durable tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new cache entry created at `now_ms` that lives for `ttl`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `now_ms` - Creation instant in Unix milliseconds
    /// * `ttl` - Time to live
    pub fn new(value: T, now_ms: u64, ttl: Duration) -> Self {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);

        Self {
            value,
            created_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// Boundary condition: an entry is live only while `now_ms < expires_at`,
    /// so it is expired at exactly `expires_at`.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, `0` once expired.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at.saturating_sub(now_ms)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value".to_string(), 1_000, Duration::from_secs(60));

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.created_at, 1_000);
        assert_eq!(entry.expires_at, 61_000);
        assert!(entry.expires_at >= entry.created_at);
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(1u32, 0, Duration::from_millis(1_000));

        assert!(!entry.is_expired_at(0));
        assert!(!entry.is_expired_at(999));
        assert!(entry.is_expired_at(1_500));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("test", 5_000, Duration::ZERO);

        // Zero TTL expires at creation
        assert!(entry.is_expired_at(5_000), "Entry should be expired at boundary");
    }

    #[test]
    fn test_ttl_remaining_ms() {
        let entry = CacheEntry::new("v", 0, Duration::from_secs(10));

        assert_eq!(entry.ttl_remaining_ms(1_000), 9_000);
        assert_eq!(entry.ttl_remaining_ms(20_000), 0);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::new("v", 10, Duration::MAX);
        assert_eq!(entry.expires_at, u64::MAX);
    }

    #[test]
    fn test_entry_serialized_shape() {
        let entry = CacheEntry::new(serde_json::json!({"id": 1}), 0, Duration::from_secs(1));
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["value"]["id"], 1);
        assert_eq!(json["created_at"], 0);
        assert_eq!(json["expires_at"], 1_000);
    }
}
