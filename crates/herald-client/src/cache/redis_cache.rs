//! Redis-based cache store implementation.

use super::CacheStore;
use herald_config::RedisConfig;
use herald_core::{HeraldError, HeraldResult};
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// TTL for every cached read in this layer (7 days).
pub const DEFAULT_TTL: Duration = Duration::from_secs(604_800);

/// Redis-based cache store.
pub struct RedisCacheStore {
    /// Redis connection pool.
    pool: Option<Arc<Pool>>,
}

impl RedisCacheStore {
    /// Create a new Redis cache store.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a cache store from configuration.
    ///
    /// A config with caching disabled yields a no-op store.
    pub fn from_config(config: &RedisConfig) -> HeraldResult<Self> {
        if !config.enabled {
            return Ok(Self::disabled());
        }

        let mut pool_config = deadpool_redis::Config::from_url(&config.url);
        pool_config.pool = Some(deadpool_redis::PoolConfig::new(config.pool_size as usize));
        let pool = pool_config
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .map_err(|e| HeraldError::Cache(format!("Failed to create Redis pool: {}", e)))?;

        Ok(Self::new(Arc::new(pool)))
    }

    /// Create a no-op cache store (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> HeraldResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool
                .get()
                .await
                .map_err(|e| HeraldError::Cache(format!("Failed to get Redis connection: {}", e))),
            None => Err(HeraldError::Cache("Cache is disabled".to_string())),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> HeraldResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| HeraldError::Cache(format!("Failed to get key '{}': {}", key, e)))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> HeraldResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| HeraldError::Cache(format!("Failed to set key '{}': {}", key, e)))?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> HeraldResult<u64> {
        if !self.is_enabled() || keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(keys)
            .await
            .map_err(|e| HeraldError::Cache(format!("Failed to delete keys {:?}: {}", keys, e)))?;

        debug!("Deleted {} of {} keys", deleted, keys.len());
        Ok(deleted as u64)
    }

    async fn delete_pattern(&self, pattern: &str) -> HeraldResult<u64> {
        if !self.is_enabled() {
            return Ok(0);
        }

        let mut conn = self.get_conn().await?;

        // Use KEYS to find matching keys (SCAN would be better for production)
        let keys: Vec<String> = deadpool_redis::redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut conn)
            .await
            .map_err(|e| HeraldError::Cache(format!("Failed to scan keys: {}", e)))?;

        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: i64 = conn
            .del(&keys)
            .await
            .map_err(|e| HeraldError::Cache(format!("Failed to delete keys: {}", e)))?;

        debug!("Deleted {} keys matching pattern '{}'", deleted, pattern);
        Ok(deleted as u64)
    }
}
