//! Caching infrastructure for the client layer.
//!
//! This module provides a cache store abstraction with a Redis
//! implementation, deterministic key builders, and the invalidation sets
//! applied after successful mutations.

mod cache_interface;
pub mod cache_keys;
mod invalidation;
mod redis_cache;

pub use cache_interface::{CacheExt, CacheStore};
pub use invalidation::InvalidationSet;
pub use redis_cache::{RedisCacheStore, DEFAULT_TTL};
