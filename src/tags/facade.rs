//! Tagged Cache Facade
//!
//! Wraps any `CacheBackend` and keeps, inside that same backend, one index
//! entry per tag listing the keys saved with it.

use tracing::{debug, trace, warn};

use crate::cache::{is_falsy, CacheBackend, CacheValue};
use crate::tags::index::{decode_index, encode_index, merge_unique, tag_fits, tag_index_key};

// == Tagged Cache ==
/// Tag-aware cache facade.
///
/// Holds no state besides the backend. Index updates are plain
/// read-modify-write sequences: two callers assigning to the same tag at the
/// same time can lose one of the updates, and two callers missing the same
/// key in `fetch_or_call` both run their producer.
#[derive(Debug, Clone)]
pub struct TaggedCache<B> {
    backend: B,
}

impl<B: CacheBackend> TaggedCache<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn contains(&self, key: &str) -> bool {
        self.backend.contains(key)
    }

    /// Deletes one entry. Tag indexes still listing `key` are left as they are.
    pub fn delete(&self, key: &str) -> bool {
        self.backend.delete(key)
    }

    pub fn stats(&self) -> B::Stats {
        self.backend.stats()
    }

    // == Fetch ==
    /// Returns the stored value, or `default` on a miss.
    ///
    /// A stored `null` or `false` is indistinguishable from a missing entry.
    pub fn fetch(&self, key: &str, default: CacheValue) -> CacheValue {
        match self.backend.get(key) {
            Some(value) if !is_falsy(&value) => value,
            _ => default,
        }
    }

    // == Fetch Or Call ==
    /// Returns the cached value, or runs `producer` once and saves its result.
    ///
    /// A `null` or `false` result is returned but not saved. The result is
    /// returned whether or not the save succeeded.
    pub fn fetch_or_call<F>(
        &self,
        key: &str,
        producer: F,
        life_time: u64,
        tags: &[&str],
    ) -> CacheValue
    where
        F: FnOnce() -> CacheValue,
    {
        let cached = self.fetch(key, CacheValue::Null);
        if !is_falsy(&cached) {
            debug!("Cache hit for '{}'", key);
            return cached;
        }

        debug!("Cache miss for '{}', calling producer", key);
        let value = producer();
        if !is_falsy(&value) {
            self.save(key, value.clone(), life_time, tags);
        }

        value
    }

    // == Save ==
    /// Writes `value` and, only if the write succeeded, assigns `key` to every tag.
    ///
    /// Returns the backend's write result. Tags longer than `MAX_TAG_LENGTH`
    /// make the whole save fail before anything is written, since their index
    /// could never be stored. Other index write failures are not reported.
    pub fn save(&self, key: &str, value: CacheValue, life_time: u64, tags: &[&str]) -> bool {
        if let Some(tag) = tags.iter().find(|tag| !tag_fits(tag)) {
            warn!("Refusing to store '{}': tag of {} bytes is too long", key, tag.len());
            return false;
        }

        if !self.backend.set(key, value, life_time) {
            warn!("Backend refused to store '{}'", key);
            return false;
        }

        debug!("Stored '{}' (life_time={}s, tags={})", key, life_time, tags.len());
        self.assign_key_to_tags(key, tags);
        true
    }

    // == Delete By Tags ==
    /// Invalidates each tag in turn, in the given order.
    pub fn delete_by_tags(&self, tags: &[&str]) {
        for tag in tags {
            self.delete_by_tag(tag);
        }
    }

    // == Delete By Tag ==
    /// Deletes every key listed under `tag`, then the index entry itself.
    ///
    /// Unknown tags are a no-op. Per-key delete results are ignored.
    pub fn delete_by_tag(&self, tag: &str) {
        let index_key = tag_index_key(tag);
        let keys = self.tagged_keys(tag);

        debug!("Invalidating tag '{}' ({} keys)", tag, keys.len());
        for key in &keys {
            trace!("Deleting '{}' for tag '{}'", key, tag);
            self.backend.delete(key);
        }

        self.backend.delete(&index_key);
    }

    // == Assign ==
    pub fn assign_key_to_tags(&self, key: &str, tags: &[&str]) {
        for tag in tags {
            self.assign_key_to_tag(key, tag);
        }
    }

    /// Adds `key` to the index of `tag`, creating the index if needed.
    ///
    /// The index is always written back with an unbounded lifetime.
    pub fn assign_key_to_tag(&self, key: &str, tag: &str) {
        let index_key = tag_index_key(tag);
        let mut keys = self.tagged_keys(tag);

        if merge_unique(&mut keys, key) {
            trace!("Tagged '{}' with '{}'", key, tag);
        }

        if !self.backend.set(&index_key, encode_index(keys), 0) {
            warn!("Failed to write index for tag '{}'", tag);
        }
    }

    /// Keys currently listed under `tag`, empty if the tag was never assigned.
    pub fn tagged_keys(&self, tag: &str) -> Vec<String> {
        let index_key = tag_index_key(tag);
        match self.fetch(&index_key, CacheValue::Null) {
            CacheValue::Null => Vec::new(),
            value => decode_index(tag, value),
        }
    }
}

// == Backend Impl ==
/// A tagged cache is itself a backend, so it can stand in for one or wrap
/// another tagged cache. `set` is an untagged `save`.
impl<B: CacheBackend> CacheBackend for TaggedCache<B> {
    type Stats = B::Stats;

    fn get(&self, key: &str) -> Option<CacheValue> {
        self.backend.get(key)
    }

    fn set(&self, key: &str, value: CacheValue, life_time: u64) -> bool {
        self.save(key, value, life_time, &[])
    }

    fn delete(&self, key: &str) -> bool {
        self.backend.delete(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.backend.contains(key)
    }

    fn stats(&self) -> B::Stats {
        self.backend.stats()
    }
}
