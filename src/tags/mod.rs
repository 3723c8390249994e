//! Tags Module
//!
//! Tag assignment on write and tag-scoped bulk invalidation over any
//! `CacheBackend`, with the tag index kept in the backend itself.

mod facade;
mod index;


pub use facade::TaggedCache;
pub use index::{tag_fits, tag_index_key, MAX_TAG_LENGTH, TAG_KEY_PREFIX};
