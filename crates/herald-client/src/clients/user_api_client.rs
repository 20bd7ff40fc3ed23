//! The user-facing client.

use crate::cache::{cache_keys, CacheExt, CacheStore, InvalidationSet, DEFAULT_TTL};
use crate::transport::ApiClient;
use herald_core::{HeraldResult, ServiceId, UserId};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Client for the user entity.
pub struct UserApiClient<A, C> {
    api: Arc<A>,
    cache: Arc<C>,
}

impl<A: ApiClient + 'static, C: CacheStore + 'static> UserApiClient<A, C> {
    /// Creates a new user client.
    pub fn new(api: Arc<A>, cache: Arc<C>) -> Self {
        Self { api, cache }
    }

    /// Fetches a user, read-through cached.
    pub async fn get_user(&self, user_id: UserId) -> HeraldResult<Value> {
        debug!("Getting user: {}", user_id);
        let key = cache_keys::user(user_id);
        let api = Arc::clone(&self.api);
        self.cache
            .read_through(&key, DEFAULT_TTL, move || async move {
                api.get(&format!("/user/{}", user_id), &[]).await
            })
            .await
    }

    /// Adds a user to a service with the given permissions.
    pub async fn add_user_to_service(
        &self,
        service_id: ServiceId,
        user_id: UserId,
        permissions: &[String],
        folder_permissions: &[Uuid],
    ) -> HeraldResult<()> {
        debug!("Adding user {} to service {}", user_id, service_id);
        let body = json!({
            "permissions": permissions
                .iter()
                .map(|permission| json!({"permission": permission}))
                .collect::<Vec<_>>(),
            "folder_permissions": folder_permissions,
        });

        self.api
            .post(&format!("/service/{}/users/{}", service_id, user_id), &body)
            .await?;
        InvalidationSet::user_added(service_id, user_id)
            .apply(self.cache.as_ref())
            .await;

        info!("User {} added to service {}", user_id, service_id);
        Ok(())
    }
}
