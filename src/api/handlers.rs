//! API Handlers
//!
//! HTTP request handlers for each service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::cache::{CacheStats, DurableCache, MemoryCache, TieredCache};
use crate::checkout::{summarize, OrderNotification, OrderTotals};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    validate_key, CleanupResponse, DeleteResponse, GetResponse, HasResponse, HealthResponse,
    NotificationRequest, SetRequest, SetResponse, SummaryRequest,
};
use crate::storage::{FileStorage, SharedStore};

/// Cache of JSON values served by the HTTP layer.
pub type JsonCache = TieredCache<Value, SharedStore>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Two-tier cache
    pub cache: Arc<JsonCache>,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: JsonCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Builds both tiers from configuration over the given durable store.
    pub fn with_storage(config: &Config, storage: SharedStore) -> Self {
        let memory = MemoryCache::new(config.default_ttl());
        let durable = DurableCache::with_options(storage, config.cache_prefix.clone(), config.durable_ttl());
        let cache = TieredCache::new(memory, durable).with_single_flight(config.single_flight);
        Self::new(cache)
    }

    /// Opens the file store at `config.storage_path` and builds both tiers.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let storage = FileStorage::open(&config.storage_path)?;
        Ok(Self::with_storage(config, Box::new(storage)))
    }
}

fn check_key(key: &str) -> Result<()> {
    match validate_key(key) {
        Some(msg) => Err(ApiError::InvalidRequest(msg)),
        None => Ok(()),
    }
}

/// Handler for PUT /set
///
/// Stores a JSON value in both tiers with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl();
    state.cache.set(&req.key, req.value, ttl).await;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Looks the key up in memory, then in durable storage.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    check_key(&key)?;

    match state.cache.get(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(ApiError::NotFound(key)),
    }
}

/// Handler for GET /has/:key
pub async fn has_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<HasResponse>> {
    check_key(&key)?;

    let exists = state.cache.has(&key).await;
    Ok(Json(HasResponse { key, exists }))
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    check_key(&key)?;

    if state.cache.delete(&key).await {
        Ok(Json(DeleteResponse::new(key)))
    } else {
        Err(ApiError::NotFound(key))
    }
}

/// Handler for POST /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<Value> {
    state.cache.clear().await;
    info!("Cache cleared");
    Json(serde_json::json!({ "message": "Cache cleared" }))
}

/// Handler for POST /cleanup
///
/// Runs one sweep of both tiers on demand.
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<CleanupResponse> {
    let removed = state.cache.cleanup().await;
    Json(CleanupResponse { removed })
}

/// Handler for GET /stats
///
/// Returns a snapshot of the in-process tier.
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.memory_stats().await)
}

/// Handler for POST /checkout/summary
pub async fn summary_handler(Json(req): Json<SummaryRequest>) -> Json<OrderTotals> {
    Json(summarize(&req.items, req.promo.as_ref()))
}

/// Handler for POST /checkout/notification
///
/// Builds the payload forwarded to the order notification sink.
pub async fn notification_handler(
    Json(req): Json<NotificationRequest>,
) -> Result<Json<OrderNotification>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let notification =
        OrderNotification::new(req.order_id, req.customer, req.items, req.promo.as_ref());
    info!(
        order_id = %notification.order_id,
        total = notification.totals.total,
        "Order notification prepared"
    );
    Ok(Json(notification))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn test_state() -> AppState {
        AppState::with_storage(&Config::default(), Box::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        let req = SetRequest {
            key: "test_key".to_string(),
            value: json!({"brand": "Apple"}),
            ttl: None,
        };
        let result = set_handler(State(state.clone()), Json(req)).await;
        assert!(result.is_ok());

        let response = get_handler(State(state.clone()), Path("test_key".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value["brand"], "Apple");
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = test_state();

        let result = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state();

        let req = SetRequest {
            key: "to_delete".to_string(),
            value: json!(1),
            ttl: None,
        };
        set_handler(State(state.clone()), Json(req)).await.unwrap();

        let result = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(result.is_ok());

        let result = has_handler(State(state), Path("to_delete".to_string()))
            .await
            .unwrap();
        assert!(!result.exists);
    }

    #[tokio::test]
    async fn test_stats_handler_empty() {
        let response = stats_handler(State(test_state())).await;
        assert_eq!(response.size, 0);
        assert_eq!(response.expired, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let req = SetRequest {
            key: "".to_string(),
            value: json!(null),
            ttl: None,
        };
        let result = set_handler(State(test_state()), Json(req)).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_summary_handler() {
        let req: SummaryRequest = serde_json::from_value(json!({
            "items": [
                {"product_id": "p1", "name": "iPhone", "brand": "Apple", "price": 1000, "quantity": 1}
            ],
            "promo": {"code": "APPLE10", "brand_discounts": {"Apple": 10}}
        }))
        .unwrap();

        let totals = summary_handler(Json(req)).await;
        assert_eq!(totals.discount, 100);
        assert_eq!(totals.total, 900);
    }
}
