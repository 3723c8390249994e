//! Tag Cache - tag-based invalidation over any key/value cache
//!
//! `TaggedCache` wraps a `CacheBackend`, records which keys were saved with
//! which tags in index entries kept inside that same backend, and deletes
//! every key of a tag in one call.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tags;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheBackend, CacheValue, MemoryStore};
pub use config::Config;
pub use tags::TaggedCache;
pub use tasks::spawn_cleanup_task;
