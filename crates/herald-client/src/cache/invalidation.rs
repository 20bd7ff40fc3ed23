//! Invalidation sets applied after successful mutations.

use super::{cache_keys, CacheStore};
use herald_core::{ServiceId, UserId};
use tracing::warn;

/// The cache entries to delete as a side effect of one mutation.
///
/// Holds ordered key batches (each batch is one multi-key delete call)
/// followed by wildcard patterns. Batches run in declaration order, empty
/// batches are skipped, and patterns always run last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationSet {
    batches: Vec<Vec<String>>,
    patterns: Vec<String>,
}

impl InvalidationSet {
    fn new() -> Self {
        Self {
            batches: Vec::new(),
            patterns: Vec::new(),
        }
    }

    fn key(mut self, key: String) -> Self {
        self.batches.push(vec![key]);
        self
    }

    fn keys(mut self, keys: Vec<String>) -> Self {
        self.batches.push(keys);
        self
    }

    fn pattern(mut self, pattern: String) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Mutation of service settings that are denormalized into cached
    /// template previews (name, senders, contact blocks).
    #[must_use]
    pub fn service_settings(service_id: ServiceId) -> Self {
        Self::new()
            .key(cache_keys::service(service_id))
            .pattern(cache_keys::service_template_pattern(service_id))
    }

    /// Mutation of service plumbing that no cached template depends on
    /// (guest list, inbound/callback configuration, membership).
    #[must_use]
    pub fn service_only(service_id: ServiceId) -> Self {
        Self::new().key(cache_keys::service(service_id))
    }

    /// Template creation. The per-template family has no entries yet, so
    /// only the list cache is stale.
    #[must_use]
    pub fn template_created(service_id: ServiceId) -> Self {
        Self::new().key(cache_keys::service_templates(service_id))
    }

    /// Any mutation of an existing template.
    #[must_use]
    pub fn template_modified(service_id: ServiceId) -> Self {
        Self::new()
            .key(cache_keys::service_templates(service_id))
            .pattern(cache_keys::service_template_pattern(service_id))
    }

    /// Service archival: every cached representation of the service and of
    /// its member users is stale.
    #[must_use]
    pub fn service_archived(service_id: ServiceId, user_ids: &[UserId]) -> Self {
        Self::new()
            .key(cache_keys::service_templates(service_id))
            .key(cache_keys::service(service_id))
            .keys(user_ids.iter().copied().map(cache_keys::user).collect())
            .pattern(cache_keys::service_template_pattern(service_id))
    }

    /// Broadcast-setting changes invalidate the named users before the
    /// service itself.
    #[must_use]
    pub fn broadcast_settings(service_id: ServiceId, user_ids: &[UserId]) -> Self {
        Self::new()
            .keys(user_ids.iter().copied().map(cache_keys::user).collect())
            .key(cache_keys::service(service_id))
    }

    /// A user joined the service.
    #[must_use]
    pub fn user_added(service_id: ServiceId, user_id: UserId) -> Self {
        Self::new()
            .key(cache_keys::service(service_id))
            .key(cache_keys::user(user_id))
    }

    /// Delete every entry in the set, exact keys first, patterns last.
    ///
    /// Cache-store failures are logged and swallowed: by the time this
    /// runs the remote mutation has already succeeded, so the caller's
    /// result must not change. A failed delete leaves a staleness window
    /// bounded by the entry TTL.
    pub async fn apply<C: CacheStore + ?Sized>(&self, cache: &C) {
        for batch in &self.batches {
            if batch.is_empty() {
                continue;
            }
            if let Err(e) = cache.delete(batch).await {
                warn!("Cache invalidation failed for {:?}: {}", batch, e);
            }
        }
        for pattern in &self.patterns {
            if let Err(e) = cache.delete_pattern(pattern).await {
                warn!("Cache invalidation failed for pattern '{}': {}", pattern, e);
            }
        }
    }

    #[cfg(test)]
    fn flat_keys(&self) -> Vec<&str> {
        self.batches
            .iter()
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::{HeraldError, HeraldResult};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingStore {
        deletes: Mutex<Vec<Vec<String>>>,
        patterns: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl CacheStore for RecordingStore {
        async fn get_raw(&self, _key: &str) -> HeraldResult<Option<String>> {
            Ok(None)
        }

        async fn set_raw(&self, _key: &str, _value: &str, _ttl: Duration) -> HeraldResult<()> {
            Ok(())
        }

        async fn delete(&self, keys: &[String]) -> HeraldResult<u64> {
            if self.fail {
                return Err(HeraldError::cache("store offline"));
            }
            self.deletes.lock().unwrap().push(keys.to_vec());
            Ok(keys.len() as u64)
        }

        async fn delete_pattern(&self, pattern: &str) -> HeraldResult<u64> {
            if self.fail {
                return Err(HeraldError::cache("store offline"));
            }
            self.patterns.lock().unwrap().push(pattern.to_string());
            Ok(0)
        }

        fn is_enabled(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_service_settings_set() {
        let id = ServiceId::new();
        let set = InvalidationSet::service_settings(id);
        assert_eq!(set.flat_keys(), vec![format!("service-{}", id)]);
        assert_eq!(set.patterns, vec![format!("service-{}-template-*", id)]);
    }

    #[test]
    fn test_template_created_has_no_pattern() {
        let id = ServiceId::new();
        let set = InvalidationSet::template_created(id);
        assert_eq!(set.flat_keys(), vec![format!("service-{}-templates", id)]);
        assert!(set.patterns.is_empty());
    }

    #[test]
    fn test_service_archived_orders_batches() {
        let id = ServiceId::new();
        let users = [UserId::new(), UserId::new()];
        let set = InvalidationSet::service_archived(id, &users);
        assert_eq!(
            set.batches,
            vec![
                vec![format!("service-{}-templates", id)],
                vec![format!("service-{}", id)],
                vec![format!("user-{}", users[0]), format!("user-{}", users[1])],
            ]
        );
        assert_eq!(set.patterns, vec![format!("service-{}-template-*", id)]);
    }

    #[test]
    fn test_broadcast_settings_deletes_users_before_service() {
        let id = ServiceId::new();
        let users = [UserId::new()];
        let set = InvalidationSet::broadcast_settings(id, &users);
        assert_eq!(
            set.batches,
            vec![
                vec![format!("user-{}", users[0])],
                vec![format!("service-{}", id)],
            ]
        );
        assert!(set.patterns.is_empty());
    }

    #[tokio::test]
    async fn test_apply_skips_empty_batches() {
        let id = ServiceId::new();
        let store = RecordingStore::default();
        InvalidationSet::service_archived(id, &[]).apply(&store).await;
        assert_eq!(
            *store.deletes.lock().unwrap(),
            vec![
                vec![format!("service-{}-templates", id)],
                vec![format!("service-{}", id)],
            ]
        );
        assert_eq!(
            *store.patterns.lock().unwrap(),
            vec![format!("service-{}-template-*", id)]
        );
    }

    #[tokio::test]
    async fn test_apply_swallows_store_errors() {
        let store = RecordingStore {
            fail: true,
            ..RecordingStore::default()
        };
        // must not panic or propagate
        InvalidationSet::service_settings(ServiceId::new())
            .apply(&store)
            .await;
    }
}
