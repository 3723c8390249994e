//! Cache Module
//!
//! The key/value capability set the tagging layer is built on, and an
//! in-memory store that satisfies it.

mod entry;
mod stats;
mod store;

use std::sync::Arc;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::MemoryStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed serialized value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// Any serializable value a cache entry can hold.
pub type CacheValue = serde_json::Value;

/// Returns true for values the facade treats the same as "no entry":
/// JSON `null` and `false`.
pub fn is_falsy(value: &CacheValue) -> bool {
    matches!(value, CacheValue::Null | CacheValue::Bool(false))
}

// == Cache Backend ==
/// Key/value store the tagging facade delegates to.
///
/// Implementations own all locking and atomicity. Each call is independent;
/// callers get no guarantee across several calls.
pub trait CacheBackend {
    /// Implementation-defined statistics snapshot.
    type Stats;

    /// Returns the stored value, or `None` when there is no live entry.
    fn get(&self, key: &str) -> Option<CacheValue>;

    /// Stores `value` under `key`. A `life_time` of `0` seconds means unbounded.
    fn set(&self, key: &str, value: CacheValue, life_time: u64) -> bool;

    /// Removes `key`. Removing an absent key must succeed as a no-op.
    fn delete(&self, key: &str) -> bool;

    fn contains(&self, key: &str) -> bool;

    fn stats(&self) -> Self::Stats;
}

impl<B: CacheBackend + ?Sized> CacheBackend for &B {
    type Stats = B::Stats;

    fn get(&self, key: &str) -> Option<CacheValue> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: CacheValue, life_time: u64) -> bool {
        (**self).set(key, value, life_time)
    }

    fn delete(&self, key: &str) -> bool {
        (**self).delete(key)
    }

    fn contains(&self, key: &str) -> bool {
        (**self).contains(key)
    }

    fn stats(&self) -> Self::Stats {
        (**self).stats()
    }
}

impl<B: CacheBackend + ?Sized> CacheBackend for Arc<B> {
    type Stats = B::Stats;

    fn get(&self, key: &str) -> Option<CacheValue> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: CacheValue, life_time: u64) -> bool {
        (**self).set(key, value, life_time)
    }

    fn delete(&self, key: &str) -> bool {
        (**self).delete(key)
    }

    fn contains(&self, key: &str) -> bool {
        (**self).contains(key)
    }

    fn stats(&self) -> Self::Stats {
        (**self).stats()
    }
}
