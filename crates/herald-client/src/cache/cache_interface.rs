//! Cache store trait for abstracted caching operations.

use herald_core::{HeraldError, HeraldResult};
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Cache store abstraction over a remote key-value service.
///
/// Uses JSON strings for type-erased storage to maintain dyn-compatibility.
/// A disabled store treats every read as a miss and every write or delete
/// as a no-op.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> HeraldResult<Option<String>>;

    /// Set a raw JSON value in the cache with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> HeraldResult<()>;

    /// Delete one or more keys in a single call.
    ///
    /// Idempotent; deleting absent keys is not an error. Returns the number
    /// of keys that existed and were deleted.
    async fn delete(&self, keys: &[String]) -> HeraldResult<u64>;

    /// Delete every key matching a wildcard pattern.
    ///
    /// Idempotent; matching zero keys is not an error. Returns the number
    /// of keys deleted.
    async fn delete_pattern(&self, pattern: &str) -> HeraldResult<u64>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Extension trait with the read-through accessor.
#[async_trait]
pub trait CacheExt: CacheStore {
    /// Serve a read from the cache, falling back to `fetch` on a miss.
    ///
    /// The cached value is the remote response envelope (`{"data": ...}`);
    /// the returned value is the envelope's `data` payload, identical in
    /// shape whether served from cache or from the remote source.
    ///
    /// Cache-store failures never fail the read path: a failed or
    /// unparsable read is treated as a miss, and a failed write is logged
    /// and swallowed after the fetched value is already in hand. Fetch
    /// errors propagate, and nothing is cached for them.
    async fn read_through<F, Fut>(&self, key: &str, ttl: Duration, fetch: F) -> HeraldResult<Value>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = HeraldResult<Value>> + Send,
    {
        match self.get_raw(key).await {
            Ok(Some(cached)) => match serde_json::from_str::<Value>(&cached) {
                Ok(mut envelope) => match envelope.get_mut("data") {
                    Some(data) => {
                        debug!("Serving '{}' from cache", key);
                        return Ok(data.take());
                    }
                    None => warn!("Cached entry for '{}' is not an envelope, refetching", key),
                },
                Err(e) => warn!("Failed to parse cached entry for '{}': {}", key, e),
            },
            Ok(None) => {}
            Err(e) => warn!("Cache read failed for '{}': {}", key, e),
        }

        let mut envelope = fetch().await?;

        match serde_json::to_string(&envelope) {
            Ok(serialized) => {
                if let Err(e) = self.set_raw(key, &serialized, ttl).await {
                    warn!("Cache write failed for '{}': {}", key, e);
                }
            }
            Err(e) => warn!("Failed to serialize envelope for '{}': {}", key, e),
        }

        match envelope.get_mut("data") {
            Some(data) => Ok(data.take()),
            None => Err(HeraldError::internal(format!(
                "Remote response for '{}' is missing the data payload",
                key
            ))),
        }
    }
}

// Blanket implementation for all CacheStore implementations
impl<T: CacheStore + ?Sized> CacheExt for T {}
