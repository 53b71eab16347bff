//! Request DTOs for the cache service API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::checkout::{CartItem, Customer, PromoCode};

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Validates a cache key, returning an error message when invalid.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value
/// - `ttl`: Optional TTL in milliseconds (uses each tier's default if not specified)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: Value,
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl.map(Duration::from_millis)
    }
}

/// Request body for POST /checkout/summary
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryRequest {
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub promo: Option<PromoCode>,
}

/// Request body for POST /checkout/notification
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationRequest {
    pub order_id: String,
    pub customer: Customer,
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub promo: Option<PromoCode>,
}

impl NotificationRequest {
    pub fn validate(&self) -> Option<String> {
        if self.order_id.trim().is_empty() {
            return Some("Order id cannot be empty".to_string());
        }
        if self.items.is_empty() {
            return Some("Order has no items".to_string());
        }
        if self.items.iter().any(|item| item.quantity == 0) {
            return Some("Item quantity must be positive".to_string());
        }
        None
    }
}
