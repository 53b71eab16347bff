//! Cache Statistics Module
//!
//! Diagnostic snapshot of the in-process tier.

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time view of a cache.
///
/// `expired` counts entries that are dead but not yet removed, so it may
/// disagree with what `get`/`has` would report right afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of stored entries, expired ones included
    pub size: usize,
    /// Number of expired entries awaiting removal
    pub expired: usize,
    /// Every stored key, expired ones included
    pub keys: Vec<String>,
}

impl CacheStats {
    // == Live Entries ==
    /// Entries that would still be returned by a read.
    pub fn live(&self) -> usize {
        self.size - self.expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.expired, 0);
        assert!(stats.keys.is_empty());
    }

    #[test]
    fn test_live_entries() {
        let stats = CacheStats {
            size: 5,
            expired: 2,
            keys: vec![],
        };
        assert_eq!(stats.live(), 3);
    }

    #[test]
    fn test_stats_serialize() {
        let stats = CacheStats {
            size: 1,
            expired: 0,
            keys: vec!["brands".to_string()],
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"size":1,"expired":0,"keys":["brands"]}"#);
    }
}
