//! Cache validity for fetched review collections.

use std::collections::HashMap;
use std::time::Duration;

/// A review collection that can tell whether it holds any data.
/// An empty collection never counts as a cache hit.
pub trait ReviewCollection: Clone + Default + Send + Sync + 'static {
    fn is_empty(&self) -> bool;
}

impl<T: Clone + Send + Sync + 'static> ReviewCollection for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl<T: Clone + Send + Sync + 'static> ReviewCollection for Option<T> {
    fn is_empty(&self) -> bool {
        self.is_none()
    }
}

impl<V: Clone + Send + Sync + 'static> ReviewCollection for HashMap<String, V> {
    fn is_empty(&self) -> bool {
        HashMap::is_empty(self)
    }
}

impl ReviewCollection for serde_json::Value {
    fn is_empty(&self) -> bool {
        match self {
            serde_json::Value::Null => true,
            serde_json::Value::Array(items) => items.is_empty(),
            serde_json::Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

/// True when a populated collection was refreshed less than `ttl` ago.
/// Without a ttl a populated collection never expires.
pub fn is_cache_valid<R: ReviewCollection>(
    reviews: &R,
    cache_timestamp: u64,
    ttl: Option<Duration>,
    now: u64,
) -> bool {
    if reviews.is_empty() {
        return false;
    }
    match ttl {
        None => true,
        Some(ttl) => u128::from(now.saturating_sub(cache_timestamp)) < ttl.as_millis(),
    }
}
