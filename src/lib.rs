//! Storefront Cache - expiring caches for a storefront backend
//!
//! Provides an in-process TTL cache, a durable namespaced TTL cache, a
//! fetch-through composition of both, an image preload cache and the checkout
//! totals calculation.

pub mod api;
pub mod cache;
pub mod checkout;
pub mod config;
pub mod error;
pub mod images;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use cache::{DurableCache, MemoryCache, TieredCache};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
