//! Cache Entry Module
//!
//! A stored value plus the expiry metadata the memory store needs.

use std::time::{SystemTime, UNIX_EPOCH};

use super::CacheValue;

// == Cache Entry ==
/// A single stored value with its expiration deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value, never inspected by the store
    pub value: CacheValue,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = unbounded lifetime
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry. A lifetime of `0` seconds means the entry never expires.
    pub fn new(value: CacheValue, life_time: u64) -> Self {
        let now = current_timestamp_ms();
        let expires_at =
            (life_time > 0).then(|| now.saturating_add(life_time.saturating_mul(1000)));

        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its deadline.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires| current_timestamp_ms() >= expires)
    }

    // == Time To Live ==
    /// Remaining lifetime in seconds, `None` for unbounded entries.
    pub fn ttl_remaining(&self) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(current_timestamp_ms()) / 1000)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
