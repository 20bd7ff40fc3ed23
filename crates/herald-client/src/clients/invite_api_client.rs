//! The invite-facing client.

use crate::cache::{CacheStore, InvalidationSet};
use crate::transport::ApiClient;
use herald_core::{HeraldResult, ServiceId, UserId};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// Client for service invitations.
pub struct InviteApiClient<A, C> {
    api: Arc<A>,
    cache: Arc<C>,
}

impl<A: ApiClient + 'static, C: CacheStore + 'static> InviteApiClient<A, C> {
    /// Creates a new invite client.
    pub fn new(api: Arc<A>, cache: Arc<C>) -> Self {
        Self { api, cache }
    }

    /// Accepts an invitation, joining the invited user to the service.
    pub async fn accept_invite(
        &self,
        service_id: ServiceId,
        invited_user_id: UserId,
    ) -> HeraldResult<()> {
        debug!(
            "Accepting invite of user {} to service {}",
            invited_user_id, service_id
        );
        self.api
            .post(
                &format!(
                    "/service/{}/invite/{}/accept",
                    service_id, invited_user_id
                ),
                &json!({}),
            )
            .await?;
        InvalidationSet::service_only(service_id)
            .apply(self.cache.as_ref())
            .await;

        info!(
            "Invite accepted for user {} on service {}",
            invited_user_id, service_id
        );
        Ok(())
    }
}
