//! Response cache with per-entry TTL.
//!
//! Expiry is checked lazily when an entry is read; nothing sweeps the store.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Key/value store for raw upstream payloads
pub trait CacheStore: Send + Sync {
    /// Cached payload, or `None` on a miss or an expired entry
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `payload` under `key` for `ttl`
    fn set(&self, key: &str, payload: Value, ttl: Duration);
}

/// Build a cache key for an endpoint call.
///
/// Parameters are sorted before hashing, so the same request always maps to
/// the same key no matter how the call site ordered them.
pub fn cache_key(endpoint: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();

    // JSON keeps names and values delimited whatever characters they hold
    let encoded = serde_json::to_vec(&(endpoint, &sorted)).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&encoded);
    format!("recipe_api:{}:{:x}", endpoint, hasher.finalize())
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Value,
    expires_at: Instant,
}

/// In-process cache, last write wins
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.lock().ok()?;
        let entry = entries.get(key)?;
        if Instant::now() >= entry.expires_at {
            return None;
        }
        Some(entry.payload.clone())
    }

    fn set(&self, key: &str, payload: Value, ttl: Duration) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key.to_string(),
                CacheEntry {
                    payload,
                    expires_at: Instant::now() + ttl,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_key_is_order_independent() {
        let a = cache_key("recipe_search", &params(&[("query", "pasta"), ("diet", "vegan")]));
        let b = cache_key("recipe_search", &params(&[("diet", "vegan"), ("query", "pasta")]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_differs_by_endpoint_and_params() {
        let base = cache_key("recipe_search", &params(&[("query", "pasta")]));
        let other_endpoint = cache_key("ingredient_search", &params(&[("query", "pasta")]));
        let other_value = cache_key("recipe_search", &params(&[("query", "soup")]));
        assert_ne!(base, other_endpoint);
        assert_ne!(base, other_value);
        assert!(base.starts_with("recipe_api:recipe_search:"));
    }

    #[test]
    fn test_key_is_unambiguous_for_embedded_separators() {
        let smuggled = cache_key("recipe_search", &params(&[("cuisine", "italian&diet=vegan")]));
        let split = cache_key(
            "recipe_search",
            &params(&[("cuisine", "italian"), ("diet", "vegan")]),
        );
        assert_ne!(smuggled, split);

        let shifted = cache_key("recipe_search", &params(&[("a=b", "c")]));
        let plain = cache_key("recipe_search", &params(&[("a", "b=c")]));
        assert_ne!(shifted, plain);
    }

    #[test]
    fn test_round_trip() {
        let cache = MemoryCache::new();
        cache.set("k", json!({"id": 1}), Duration::from_secs(60));
        assert_eq!(cache.get("k"), Some(json!({"id": 1})));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = MemoryCache::new();
        cache.set("k", json!("v"), Duration::from_millis(20));
        assert!(cache.get("k").is_some());
        sleep(Duration::from_millis(40));
        assert_eq!(cache.get("k"), None);
        // lazily expired, still stored
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_last_write_wins() {
        let cache = MemoryCache::new();
        cache.set("k", json!(1), Duration::from_secs(60));
        cache.set("k", json!(2), Duration::from_secs(60));
        assert_eq!(cache.get("k"), Some(json!(2)));
    }
}
