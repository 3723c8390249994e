//! API Handlers
//!
//! HTTP request handlers, each a thin call into the tagged cache.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::cache::{is_falsy, CacheValue, MemoryStore};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, InvalidateRequest, InvalidateResponse,
    SetRequest, SetResponse, StatsResponse, TagResponse,
};
use crate::tags::TaggedCache;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Tagged cache over the shared memory store
    pub cache: TaggedCache<Arc<MemoryStore>>,
    /// Lifetime applied when a SET request gives none
    pub default_ttl: u64,
}

impl AppState {
    pub fn new(store: Arc<MemoryStore>, default_ttl: u64) -> Self {
        Self {
            cache: TaggedCache::new(store),
            default_ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config.default_ttl)
    }

    /// The underlying store, shared with background tasks.
    pub fn store(&self) -> Arc<MemoryStore> {
        Arc::clone(self.cache.backend())
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.unwrap_or(state.default_ttl);
    let tags: Vec<&str> = req.tags.iter().map(String::as_str).collect();
    if !state.cache.save(&req.key, req.value, ttl, &tags) {
        return Err(CacheError::StoreFailed(req.key));
    }

    Ok(Json(SetResponse::new(req.key, req.tags)))
}

/// Handler for GET /get/:key
///
/// Stored `null` and `false` values answer 404 like missing keys.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state.cache.fetch(&key, CacheValue::Null);
    if is_falsy(&value) {
        return Err(CacheError::NotFound(key));
    }

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
///
/// Tag indexes still list the key afterwards.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.store().remove(&key)?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /tags/:tag
pub async fn tag_handler(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Json<TagResponse> {
    let keys = state.cache.tagged_keys(&tag);
    Json(TagResponse { tag, keys })
}

/// Handler for DELETE /tags/:tag
pub async fn delete_tag_handler(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Json<InvalidateResponse> {
    state.cache.delete_by_tag(&tag);
    info!("Invalidated tag '{}'", tag);

    Json(InvalidateResponse::new(vec![tag]))
}

/// Handler for POST /tags/invalidate
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Json<InvalidateResponse> {
    let tags: Vec<&str> = req.tags.iter().map(String::as_str).collect();
    state.cache.delete_by_tags(&tags);
    info!("Invalidated {} tag(s)", tags.len());

    Json(InvalidateResponse::new(req.tags))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
