//! API Routes
//!
//! Configures the Axum router with all tag cache endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, delete_tag_handler, get_handler, health_handler, invalidate_handler,
    set_handler, stats_handler, tag_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a value, optionally tagged
/// - `GET /get/:key` - Retrieve a value by key
/// - `DELETE /del/:key` - Delete a key (tag indexes are left as they are)
/// - `GET /tags/:tag` - List keys indexed under a tag
/// - `DELETE /tags/:tag` - Invalidate every key under a tag
/// - `POST /tags/invalidate` - Invalidate several tags in order
/// - `GET /stats` - Backend statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/tags/invalidate", post(invalidate_handler))
        .route("/tags/:tag", get(tag_handler).delete(delete_tag_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
