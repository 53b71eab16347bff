//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_CLEANUP_INTERVAL, DEFAULT_DURABLE_TTL, DEFAULT_PREFIX, DEFAULT_TTL};

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default TTL in milliseconds of the in-process tier
    pub default_ttl_ms: u64,
    /// Default TTL in milliseconds of the durable tier
    pub durable_ttl_ms: u64,
    /// Namespace prefix for durable keys
    pub cache_prefix: String,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Path of the durable store file
    pub storage_path: PathBuf,
    /// Whether concurrent misses for one key share a single fetch
    pub single_flight: bool,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL_MS` - In-process TTL in ms (default: 300000)
    /// - `DURABLE_TTL_MS` - Durable TTL in ms (default: 86400000)
    /// - `CACHE_PREFIX` - Durable key prefix (default: "storefront_cache_")
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 300)
    /// - `STORAGE_PATH` - Durable store file (default: "./data/cache.json")
    /// - `SINGLE_FLIGHT` - "true"/"false" (default: false)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl_ms: parse_var("DEFAULT_TTL_MS").unwrap_or(defaults.default_ttl_ms),
            durable_ttl_ms: parse_var("DURABLE_TTL_MS").unwrap_or(defaults.durable_ttl_ms),
            cache_prefix: env::var("CACHE_PREFIX").unwrap_or(defaults.cache_prefix),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            storage_path: env::var("STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            single_flight: parse_var("SINGLE_FLIGHT").unwrap_or(defaults.single_flight),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    pub fn durable_ttl(&self) -> Duration {
        Duration::from_millis(self.durable_ttl_ms)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl_ms: DEFAULT_TTL.as_millis() as u64,
            durable_ttl_ms: DEFAULT_DURABLE_TTL.as_millis() as u64,
            cache_prefix: DEFAULT_PREFIX.to_string(),
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL.as_secs(),
            storage_path: PathBuf::from("./data/cache.json"),
            single_flight: false,
            server_port: 3000,
        }
    }
}
