//! API Routes
//!
//! Configures the Axum router with all service endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cleanup_handler, clear_handler, delete_handler, get_handler, has_handler, health_handler,
    notification_handler, set_handler, stats_handler, summary_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a JSON value in both tiers
/// - `GET /get/:key` - Retrieve a value by key
/// - `GET /has/:key` - Check whether a key is live
/// - `DELETE /del/:key` - Delete a key from both tiers
/// - `POST /clear` - Remove every entry
/// - `POST /cleanup` - Sweep expired entries now
/// - `GET /stats` - In-process tier snapshot
/// - `POST /checkout/summary` - Cart totals with promo discounts
/// - `POST /checkout/notification` - Order notification payload
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/has/:key", get(has_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/clear", post(clear_handler))
        .route("/cleanup", post(cleanup_handler))
        .route("/stats", get(stats_handler))
        .route("/checkout/summary", post(summary_handler))
        .route("/checkout/notification", post(notification_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
