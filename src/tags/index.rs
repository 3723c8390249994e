//! Tag Index Helpers
//!
//! A tag index is an ordinary cache entry holding the list of keys
//! currently tagged with one tag.

use tracing::warn;

use crate::cache::{CacheValue, MAX_KEY_LENGTH};

/// Reserved prefix of every tag index key.
pub const TAG_KEY_PREFIX: &str = "__tag_cache_tag";

/// Longest tag, in bytes, whose index key still fits in `MAX_KEY_LENGTH`.
pub const MAX_TAG_LENGTH: usize = MAX_KEY_LENGTH - TAG_KEY_PREFIX.len() - 2;

// == Index Key ==
/// Derives the reserved key a tag's index is stored under.
///
/// The derived key is `TAG_KEY_PREFIX.len() + 2` bytes longer than the tag,
/// so tags over `MAX_TAG_LENGTH` bytes produce keys the memory store refuses.
/// The whole index is also one value and is bound by `MAX_VALUE_SIZE` once
/// serialized.
///
/// Tag content is not escaped: a caller key that happens to equal a derived
/// key would share storage with that tag's index.
pub fn tag_index_key(tag: &str) -> String {
    format!("{}[{}]", TAG_KEY_PREFIX, tag)
}

/// Returns true when the index key for `tag` fits within `MAX_KEY_LENGTH`.
pub fn tag_fits(tag: &str) -> bool {
    tag.len() <= MAX_TAG_LENGTH
}

// == Merge ==
/// Appends `key` unless already present. Returns whether the list changed.
pub(crate) fn merge_unique(keys: &mut Vec<String>, key: &str) -> bool {
    if keys.iter().any(|k| k == key) {
        return false;
    }
    keys.push(key.to_string());
    true
}

// == Decode / Encode ==
/// Reads an index value back into its key list.
///
/// Anything that is not an array of strings is logged and read as empty.
pub(crate) fn decode_index(tag: &str, value: CacheValue) -> Vec<String> {
    match serde_json::from_value(value) {
        Ok(keys) => keys,
        Err(e) => {
            warn!("Ignoring malformed index for tag '{}': {}", tag, e);
            Vec::new()
        }
    }
}

/// Writes a key list as the JSON array stored under the index key.
pub(crate) fn encode_index(keys: Vec<String>) -> CacheValue {
    CacheValue::from(keys)
}
