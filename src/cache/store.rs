//! Memory Store Module
//!
//! HashMap-backed store with per-entry lifetimes. Every call takes the
//! store mutex once, so each single operation is atomic; nothing spans calls.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::cache::{
    CacheBackend, CacheEntry, CacheStats, CacheValue, MAX_KEY_LENGTH, MAX_VALUE_SIZE,
};
use crate::error::{CacheError, Result};

#[derive(Debug, Default)]
struct StoreState {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

impl StoreState {
    fn sync_total(&mut self) {
        let count = self.entries.len();
        self.stats.set_total_entries(count);
    }
}

// == Memory Store ==
/// In-memory `CacheBackend` with TTL support and hit/miss statistics.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Insert ==
    /// Stores a value, replacing any previous entry and resetting its lifetime.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `life_time` - Lifetime in seconds, `0` for unbounded
    pub fn insert(&self, key: &str, value: CacheValue, life_time: u64) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
        }

        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        let size = serde_json::to_vec(&value)
            .map_err(|e| CacheError::Internal(e.to_string()))?
            .len();
        if size > MAX_VALUE_SIZE {
            return Err(CacheError::InvalidRequest(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        let mut state = self.state();
        state
            .entries
            .insert(key.to_string(), CacheEntry::new(value, life_time));
        state.sync_total();

        Ok(())
    }

    // == Lookup ==
    /// Returns the value for `key`. Expired entries are dropped and count as misses.
    pub fn lookup(&self, key: &str) -> Result<CacheValue> {
        let mut guard = self.state();
        let state = &mut *guard;

        let expired = match state.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let value = entry.value.clone();
                state.stats.record_hit();
                return Ok(value);
            }
            Some(_) => true,
            None => false,
        };

        state.stats.record_miss();
        if expired {
            state.entries.remove(key);
            state.stats.record_expirations(1);
            state.sync_total();
            Err(CacheError::Expired(key.to_string()))
        } else {
            Err(CacheError::NotFound(key.to_string()))
        }
    }

    // == Remove ==
    /// Removes an entry, failing with `NotFound` when there is none.
    ///
    /// An expired entry is still dropped but reported as `Expired`.
    pub fn remove(&self, key: &str) -> Result<()> {
        let mut state = self.state();
        let removed = state.entries.remove(key);
        state.sync_total();

        match removed {
            Some(entry) if !entry.is_expired() => Ok(()),
            Some(_) => {
                state.stats.record_expirations(1);
                Err(CacheError::Expired(key.to_string()))
            }
            None => Err(CacheError::NotFound(key.to_string())),
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let mut state = self.state();
        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired());

        let removed = before - state.entries.len();
        state.stats.record_expirations(removed);
        state.sync_total();
        removed
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().entries.is_empty()
    }
}

impl CacheBackend for MemoryStore {
    type Stats = CacheStats;

    fn get(&self, key: &str) -> Option<CacheValue> {
        self.lookup(key).ok()
    }

    fn set(&self, key: &str, value: CacheValue, life_time: u64) -> bool {
        match self.insert(key, value, life_time) {
            Ok(()) => true,
            Err(e) => {
                debug!("Rejected write for '{}': {}", key, e);
                false
            }
        }
    }

    fn delete(&self, key: &str) -> bool {
        // Absent keys are a successful no-op.
        let _ = self.remove(key);
        true
    }

    fn contains(&self, key: &str) -> bool {
        self.state()
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    fn stats(&self) -> CacheStats {
        let mut state = self.state();
        state.sync_total();
        state.stats.clone()
    }
}
