//! Request DTOs for the tag cache API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::{CacheValue, MAX_KEY_LENGTH};
use crate::tags::{tag_fits, MAX_TAG_LENGTH};

/// Request body for the SET operation (PUT /set)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// Any JSON value
    pub value: CacheValue,
    /// Optional lifetime in seconds, 0 = unbounded
    #[serde(default)]
    pub ttl: Option<u64>,
    /// Tags to assign the key to
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} characters",
                MAX_KEY_LENGTH
            ));
        }
        if self.tags.iter().any(|tag| !tag_fits(tag)) {
            return Some(format!(
                "Tag exceeds maximum length of {} characters",
                MAX_TAG_LENGTH
            ));
        }
        None
    }
}

/// Request body for bulk invalidation (POST /tags/invalidate)
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    pub tags: Vec<String>,
}
