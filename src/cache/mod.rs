//! Cache Module
//!
//! Expiring key-value caches: an in-process tier, a durable tier and a
//! composition of both in front of an async fetch.

mod clock;
mod durable;
mod entry;
mod stats;
mod store;
mod tiered;


use std::time::Duration;

// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use durable::DurableCache;
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::MemoryCache;
pub use tiered::TieredCache;

// == Public Constants ==
/// Default TTL of the in-process tier
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default TTL of the durable tier
pub const DEFAULT_DURABLE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Namespace prepended to every durable key
pub const DEFAULT_PREFIX: &str = "storefront_cache_";

/// Default interval of the background sweep
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);
