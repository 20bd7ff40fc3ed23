//! The service-facing client: cached reads and invalidating mutations.

use crate::cache::{cache_keys, CacheExt, CacheStore, InvalidationSet, DEFAULT_TTL};
use crate::dto::{
    to_object, validate_update_attributes, BroadcastSettings, CreateServiceRequest,
    GuestListUpdate, NewTemplate, ServiceUpdate, TemplateType, TemplateUpdate, ValidateExt,
};
use crate::transport::{data_payload, ApiClient};
use herald_core::{HeraldError, HeraldResult, ServiceId, TemplateId, UserId};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Stamps the acting user into a request body.
fn with_actor(mut body: Map<String, Value>, actor: UserId) -> Value {
    body.insert("created_by".to_string(), json!(actor));
    Value::Object(body)
}

/// Client for the service entity and its sub-resources.
///
/// Constructed with its transport and cache-store collaborators; reads go
/// through the cache, mutations invalidate it after the remote call
/// succeeds. Remote payloads are schemaless (`serde_json::Value`); this
/// layer proxies them, it does not model them.
pub struct ServiceApiClient<A, C> {
    api: Arc<A>,
    cache: Arc<C>,
}

impl<A: ApiClient + 'static, C: CacheStore + 'static> ServiceApiClient<A, C> {
    /// Creates a new service client.
    pub fn new(api: Arc<A>, cache: Arc<C>) -> Self {
        Self { api, cache }
    }

    /// Performs one mutation and, only if it succeeds, applies the
    /// invalidation set for it.
    async fn post_invalidate(
        &self,
        path: &str,
        body: &Value,
        invalidation: InvalidationSet,
    ) -> HeraldResult<Value> {
        let envelope = self.api.post(path, body).await?;
        invalidation.apply(self.cache.as_ref()).await;
        Ok(envelope)
    }

    // ============ Reads ============

    /// Fetches a service, read-through cached.
    pub async fn get_service(&self, service_id: ServiceId) -> HeraldResult<Value> {
        debug!("Getting service: {}", service_id);
        let key = cache_keys::service(service_id);
        let api = Arc::clone(&self.api);
        self.cache
            .read_through(&key, DEFAULT_TTL, move || async move {
                api.get(&format!("/service/{}", service_id), &[]).await
            })
            .await
    }

    /// Fetches a service's template list, read-through cached.
    pub async fn get_service_templates(&self, service_id: ServiceId) -> HeraldResult<Value> {
        debug!("Getting templates for service: {}", service_id);
        let key = cache_keys::service_templates(service_id);
        let api = Arc::clone(&self.api);
        self.cache
            .read_through(&key, DEFAULT_TTL, move || async move {
                api.get(
                    &format!("/service/{}/template", service_id),
                    &[("detailed", "false".to_string())],
                )
                .await
            })
            .await
    }

    /// Fetches one template, optionally at a pinned version, read-through
    /// cached per version.
    pub async fn get_service_template(
        &self,
        service_id: ServiceId,
        template_id: TemplateId,
        version: Option<u32>,
    ) -> HeraldResult<Value> {
        debug!("Getting template {} of service {}", template_id, service_id);
        let key = cache_keys::service_template(service_id, template_id, version);
        let path = match version {
            Some(version) => format!(
                "/service/{}/template/{}/version/{}",
                service_id, template_id, version
            ),
            None => format!("/service/{}/template/{}", service_id, template_id),
        };
        let api = Arc::clone(&self.api);
        self.cache
            .read_through(&key, DEFAULT_TTL, move || async move {
                api.get(&path, &[]).await
            })
            .await
    }

    /// Fetches a template's version history, read-through cached.
    pub async fn get_service_template_versions(
        &self,
        service_id: ServiceId,
        template_id: TemplateId,
    ) -> HeraldResult<Value> {
        debug!(
            "Getting versions of template {} of service {}",
            template_id, service_id
        );
        let key = cache_keys::service_template_versions(service_id, template_id);
        let path = format!("/service/{}/template/{}/versions", service_id, template_id);
        let api = Arc::clone(&self.api);
        self.cache
            .read_through(&key, DEFAULT_TTL, move || async move {
                api.get(&path, &[]).await
            })
            .await
    }

    /// Fetches the returned-letter summary, read-through cached.
    pub async fn get_returned_letter_summary(
        &self,
        service_id: ServiceId,
    ) -> HeraldResult<Value> {
        let key = cache_keys::returned_letter_summary(service_id);
        let path = format!("/service/{}/returned-letter-summary", service_id);
        let api = Arc::clone(&self.api);
        self.cache
            .read_through(&key, DEFAULT_TTL, move || async move {
                api.get(&path, &[]).await
            })
            .await
    }

    /// Fetches the returned-letter statistics, read-through cached.
    pub async fn get_returned_letter_statistics(
        &self,
        service_id: ServiceId,
    ) -> HeraldResult<Value> {
        let key = cache_keys::returned_letter_statistics(service_id);
        let path = format!("/service/{}/returned-letter-statistics", service_id);
        let api = Arc::clone(&self.api);
        self.cache
            .read_through(&key, DEFAULT_TTL, move || async move {
                api.get(&path, &[]).await
            })
            .await
    }

    /// Fetches delivery statistics. Time-windowed, so never cached.
    pub async fn get_service_statistics(
        &self,
        service_id: ServiceId,
        limit_days: Option<u32>,
    ) -> HeraldResult<Value> {
        let mut params = Vec::new();
        if let Some(limit_days) = limit_days {
            params.push(("limit_days", limit_days.to_string()));
        }
        let envelope = self
            .api
            .get(&format!("/service/{}/statistics", service_id), &params)
            .await?;
        data_payload(envelope)
    }

    /// Fetches the precompiled-letter template, uncached.
    pub async fn get_precompiled_template(&self, service_id: ServiceId) -> HeraldResult<Value> {
        let envelope = self
            .api
            .get(&format!("/service/{}/template/precompiled", service_id), &[])
            .await?;
        data_payload(envelope)
    }

    /// Fetches the guest list, uncached.
    pub async fn get_guest_list(&self, service_id: ServiceId) -> HeraldResult<Value> {
        let envelope = self
            .api
            .get(&format!("/service/{}/guest-list", service_id), &[])
            .await?;
        data_payload(envelope)
    }

    /// Counts a service's templates, optionally of one type, from the
    /// cached template list.
    pub async fn count_service_templates(
        &self,
        service_id: ServiceId,
        template_type: Option<TemplateType>,
    ) -> HeraldResult<usize> {
        let templates = self.get_service_templates(service_id).await?;
        let templates = templates.as_array().cloned().unwrap_or_default();
        Ok(templates
            .iter()
            .filter(|template| match template_type {
                Some(wanted) => template.get("template_type").and_then(Value::as_str)
                    == Some(wanted.as_str()),
                None => true,
            })
            .count())
    }

    // ============ Mutations ============

    /// Creates a service and returns its id. Nothing is cached for a new
    /// service, so nothing is invalidated.
    pub async fn create_service(
        &self,
        request: &CreateServiceRequest,
        actor: UserId,
    ) -> HeraldResult<ServiceId> {
        debug!("Creating service: {}", request.service_name);
        request.validate_request()?;

        let mut body = Map::new();
        body.insert("active".to_string(), json!(true));
        // the caller-facing field is service_name; the remote API wants name
        body.insert("name".to_string(), json!(request.service_name));
        body.insert(
            "organisation_type".to_string(),
            json!(request.organisation_type),
        );
        body.insert(
            "email_message_limit".to_string(),
            json!(request.email_message_limit),
        );
        body.insert(
            "sms_message_limit".to_string(),
            json!(request.sms_message_limit),
        );
        body.insert(
            "letter_message_limit".to_string(),
            json!(request.letter_message_limit),
        );
        body.insert("restricted".to_string(), json!(request.restricted));
        body.insert("user_id".to_string(), json!(request.user_id));
        body.insert("email_from".to_string(), json!(request.email_from));

        let envelope = self.api.post("/service", &with_actor(body, actor)).await?;
        let data = data_payload(envelope)?;
        let service_id = data
            .get("id")
            .and_then(Value::as_str)
            .and_then(|id| ServiceId::parse(id).ok())
            .ok_or_else(|| HeraldError::internal("Create-service response is missing an id"))?;

        info!("Service created: {}", service_id);
        Ok(service_id)
    }

    /// Applies a typed partial update to a service.
    pub async fn update_service(
        &self,
        service_id: ServiceId,
        update: &ServiceUpdate,
        actor: UserId,
    ) -> HeraldResult<Value> {
        debug!("Updating service: {}", service_id);
        let body = with_actor(to_object(update)?, actor);
        let envelope = self
            .post_invalidate(
                &format!("/service/{}", service_id),
                &body,
                InvalidationSet::service_settings(service_id),
            )
            .await?;
        info!("Service updated: {}", service_id);
        data_payload(envelope)
    }

    /// Applies an untyped partial update arriving from a form boundary.
    /// Attribute names are checked against the allow-list before any
    /// request body is built.
    pub async fn update_service_with_properties(
        &self,
        service_id: ServiceId,
        properties: Map<String, Value>,
        actor: UserId,
    ) -> HeraldResult<Value> {
        debug!("Updating service {} with properties", service_id);
        validate_update_attributes(properties.keys().map(String::as_str))?;

        let body = with_actor(properties, actor);
        let envelope = self
            .post_invalidate(
                &format!("/service/{}", service_id),
                &body,
                InvalidationSet::service_settings(service_id),
            )
            .await?;
        info!("Service updated: {}", service_id);
        data_payload(envelope)
    }

    /// Archives a service. `cached_user_ids` are the members whose cached
    /// representations list the service and so go stale with it.
    pub async fn archive_service(
        &self,
        service_id: ServiceId,
        cached_user_ids: &[UserId],
    ) -> HeraldResult<()> {
        debug!("Archiving service: {}", service_id);
        self.post_invalidate(
            &format!("/service/{}/archive", service_id),
            &json!({}),
            InvalidationSet::service_archived(service_id, cached_user_ids),
        )
        .await?;
        info!("Service archived: {}", service_id);
        Ok(())
    }

    /// Switches a service to broadcast sending. Invalidates the named
    /// users before the service itself.
    pub async fn set_service_broadcast_settings(
        &self,
        service_id: ServiceId,
        settings: &BroadcastSettings,
        user_ids: &[UserId],
    ) -> HeraldResult<()> {
        debug!("Setting broadcast settings for service: {}", service_id);
        let body = serde_json::to_value(settings)?;
        self.post_invalidate(
            &format!("/service/{}/set-as-broadcast-service", service_id),
            &body,
            InvalidationSet::broadcast_settings(service_id, user_ids),
        )
        .await?;
        info!("Broadcast settings updated for service: {}", service_id);
        Ok(())
    }

    /// Removes a user from a service.
    pub async fn remove_user_from_service(
        &self,
        service_id: ServiceId,
        user_id: UserId,
    ) -> HeraldResult<()> {
        debug!("Removing user {} from service {}", user_id, service_id);
        self.api
            .delete(&format!("/service/{}/users/{}", service_id, user_id))
            .await?;
        InvalidationSet::service_only(service_id)
            .apply(self.cache.as_ref())
            .await;
        info!("User {} removed from service {}", user_id, service_id);
        Ok(())
    }

    /// Replaces the guest list.
    pub async fn update_guest_list(
        &self,
        service_id: ServiceId,
        guest_list: &GuestListUpdate,
    ) -> HeraldResult<()> {
        debug!("Updating guest list for service: {}", service_id);
        let body = serde_json::to_value(guest_list)?;
        self.api
            .put(&format!("/service/{}/guest-list", service_id), &body)
            .await?;
        InvalidationSet::service_only(service_id)
            .apply(self.cache.as_ref())
            .await;
        Ok(())
    }

    // ============ Templates ============

    /// Creates a template. Only the list cache is stale; the per-template
    /// family has no entries yet.
    pub async fn create_service_template(
        &self,
        service_id: ServiceId,
        template: &NewTemplate,
        actor: UserId,
    ) -> HeraldResult<Value> {
        debug!("Creating template for service: {}", service_id);
        template.validate_request()?;

        let mut body = to_object(template)?;
        body.insert("service".to_string(), json!(service_id));
        let envelope = self
            .post_invalidate(
                &format!("/service/{}/template", service_id),
                &with_actor(body, actor),
                InvalidationSet::template_created(service_id),
            )
            .await?;
        info!("Template created for service: {}", service_id);
        data_payload(envelope)
    }

    /// Applies a partial update to a template.
    pub async fn update_service_template(
        &self,
        service_id: ServiceId,
        template_id: TemplateId,
        update: &TemplateUpdate,
        actor: UserId,
    ) -> HeraldResult<Value> {
        debug!("Updating template {} of service {}", template_id, service_id);
        let body = with_actor(to_object(update)?, actor);
        let envelope = self
            .post_invalidate(
                &format!("/service/{}/template/{}", service_id, template_id),
                &body,
                InvalidationSet::template_modified(service_id),
            )
            .await?;
        info!("Template updated: {}", template_id);
        data_payload(envelope)
    }

    /// Redacts personalisation from a template's stored notifications.
    pub async fn redact_service_template(
        &self,
        service_id: ServiceId,
        template_id: TemplateId,
        actor: UserId,
    ) -> HeraldResult<()> {
        debug!("Redacting template {} of service {}", template_id, service_id);
        let mut body = Map::new();
        body.insert("redact_personalisation".to_string(), json!(true));
        self.post_invalidate(
            &format!("/service/{}/template/{}", service_id, template_id),
            &with_actor(body, actor),
            InvalidationSet::template_modified(service_id),
        )
        .await?;
        Ok(())
    }

    /// Points a template at a different reply-to sender; `None` clears it.
    pub async fn update_service_template_sender(
        &self,
        service_id: ServiceId,
        template_id: TemplateId,
        sender_id: Option<Uuid>,
        actor: UserId,
    ) -> HeraldResult<()> {
        debug!(
            "Updating sender of template {} of service {}",
            template_id, service_id
        );
        let mut body = Map::new();
        body.insert("reply_to".to_string(), json!(sender_id));
        self.post_invalidate(
            &format!("/service/{}/template/{}", service_id, template_id),
            &with_actor(body, actor),
            InvalidationSet::template_modified(service_id),
        )
        .await?;
        Ok(())
    }

    /// Changes the postage class of a letter template.
    pub async fn update_service_template_postage(
        &self,
        service_id: ServiceId,
        template_id: TemplateId,
        postage: &str,
        actor: UserId,
    ) -> HeraldResult<()> {
        debug!(
            "Updating postage of template {} of service {}",
            template_id, service_id
        );
        let mut body = Map::new();
        body.insert("postage".to_string(), json!(postage));
        self.post_invalidate(
            &format!("/service/{}/template/{}", service_id, template_id),
            &with_actor(body, actor),
            InvalidationSet::template_modified(service_id),
        )
        .await?;
        Ok(())
    }

    /// Soft-deletes a template by archiving it.
    pub async fn delete_service_template(
        &self,
        service_id: ServiceId,
        template_id: TemplateId,
        actor: UserId,
    ) -> HeraldResult<()> {
        debug!("Deleting template {} of service {}", template_id, service_id);
        let mut body = Map::new();
        body.insert("archived".to_string(), json!(true));
        self.post_invalidate(
            &format!("/service/{}/template/{}", service_id, template_id),
            &with_actor(body, actor),
            InvalidationSet::template_modified(service_id),
        )
        .await?;
        info!("Template deleted: {}", template_id);
        Ok(())
    }

    // ============ Senders ============

    /// Adds a reply-to email address.
    pub async fn add_reply_to_email_address(
        &self,
        service_id: ServiceId,
        email_address: &str,
        is_default: bool,
    ) -> HeraldResult<()> {
        self.post_invalidate(
            &format!("/service/{}/email-reply-to", service_id),
            &json!({"email_address": email_address, "is_default": is_default}),
            InvalidationSet::service_settings(service_id),
        )
        .await?;
        Ok(())
    }

    /// Updates a reply-to email address.
    pub async fn update_reply_to_email_address(
        &self,
        service_id: ServiceId,
        reply_to_id: Uuid,
        email_address: &str,
        is_default: bool,
    ) -> HeraldResult<()> {
        self.post_invalidate(
            &format!("/service/{}/email-reply-to/{}", service_id, reply_to_id),
            &json!({"email_address": email_address, "is_default": is_default}),
            InvalidationSet::service_settings(service_id),
        )
        .await?;
        Ok(())
    }

    /// Removes a reply-to email address.
    pub async fn delete_reply_to_email_address(
        &self,
        service_id: ServiceId,
        reply_to_id: Uuid,
    ) -> HeraldResult<()> {
        self.post_invalidate(
            &format!(
                "/service/{}/email-reply-to/{}/archive",
                service_id, reply_to_id
            ),
            &json!({}),
            InvalidationSet::service_settings(service_id),
        )
        .await?;
        Ok(())
    }

    /// Adds a letter contact block.
    pub async fn add_letter_contact(
        &self,
        service_id: ServiceId,
        contact_block: &str,
        is_default: bool,
    ) -> HeraldResult<()> {
        self.post_invalidate(
            &format!("/service/{}/letter-contact", service_id),
            &json!({"contact_block": contact_block, "is_default": is_default}),
            InvalidationSet::service_settings(service_id),
        )
        .await?;
        Ok(())
    }

    /// Updates a letter contact block.
    pub async fn update_letter_contact(
        &self,
        service_id: ServiceId,
        letter_contact_id: Uuid,
        contact_block: &str,
        is_default: bool,
    ) -> HeraldResult<()> {
        self.post_invalidate(
            &format!("/service/{}/letter-contact/{}", service_id, letter_contact_id),
            &json!({"contact_block": contact_block, "is_default": is_default}),
            InvalidationSet::service_settings(service_id),
        )
        .await?;
        Ok(())
    }

    /// Removes a letter contact block.
    pub async fn delete_letter_contact(
        &self,
        service_id: ServiceId,
        letter_contact_id: Uuid,
    ) -> HeraldResult<()> {
        self.post_invalidate(
            &format!(
                "/service/{}/letter-contact/{}/archive",
                service_id, letter_contact_id
            ),
            &json!({}),
            InvalidationSet::service_settings(service_id),
        )
        .await?;
        Ok(())
    }

    /// Adds an SMS sender.
    pub async fn add_sms_sender(
        &self,
        service_id: ServiceId,
        sms_sender: &str,
        is_default: bool,
    ) -> HeraldResult<()> {
        self.post_invalidate(
            &format!("/service/{}/sms-sender", service_id),
            &json!({"sms_sender": sms_sender, "is_default": is_default}),
            InvalidationSet::service_settings(service_id),
        )
        .await?;
        Ok(())
    }

    /// Updates an SMS sender.
    pub async fn update_sms_sender(
        &self,
        service_id: ServiceId,
        sms_sender_id: Uuid,
        sms_sender: &str,
        is_default: bool,
    ) -> HeraldResult<()> {
        self.post_invalidate(
            &format!("/service/{}/sms-sender/{}", service_id, sms_sender_id),
            &json!({"sms_sender": sms_sender, "is_default": is_default}),
            InvalidationSet::service_settings(service_id),
        )
        .await?;
        Ok(())
    }

    /// Removes an SMS sender.
    pub async fn delete_sms_sender(
        &self,
        service_id: ServiceId,
        sms_sender_id: Uuid,
    ) -> HeraldResult<()> {
        self.post_invalidate(
            &format!("/service/{}/sms-sender/{}/archive", service_id, sms_sender_id),
            &json!({}),
            InvalidationSet::service_settings(service_id),
        )
        .await?;
        Ok(())
    }

    // ============ Inbound and callback configuration ============

    /// Registers the inbound-SMS callback.
    pub async fn create_service_inbound_api(
        &self,
        service_id: ServiceId,
        url: &str,
        bearer_token: &str,
        user_id: UserId,
    ) -> HeraldResult<()> {
        self.post_invalidate(
            &format!("/service/{}/inbound-api", service_id),
            &json!({"url": url, "bearer_token": bearer_token, "updated_by_id": user_id}),
            InvalidationSet::service_only(service_id),
        )
        .await?;
        Ok(())
    }

    /// Updates the inbound-SMS callback.
    pub async fn update_service_inbound_api(
        &self,
        service_id: ServiceId,
        inbound_api_id: Uuid,
        url: &str,
        bearer_token: &str,
        user_id: UserId,
    ) -> HeraldResult<()> {
        self.post_invalidate(
            &format!("/service/{}/inbound-api/{}", service_id, inbound_api_id),
            &json!({"url": url, "bearer_token": bearer_token, "updated_by_id": user_id}),
            InvalidationSet::service_only(service_id),
        )
        .await?;
        Ok(())
    }

    /// Registers the delivery-receipt callback.
    pub async fn create_service_callback_api(
        &self,
        service_id: ServiceId,
        url: &str,
        bearer_token: &str,
        user_id: UserId,
    ) -> HeraldResult<()> {
        self.post_invalidate(
            &format!("/service/{}/delivery-receipt-api", service_id),
            &json!({"url": url, "bearer_token": bearer_token, "updated_by_id": user_id}),
            InvalidationSet::service_only(service_id),
        )
        .await?;
        Ok(())
    }

    /// Updates the delivery-receipt callback.
    pub async fn update_service_callback_api(
        &self,
        service_id: ServiceId,
        callback_api_id: Uuid,
        url: &str,
        bearer_token: &str,
        user_id: UserId,
    ) -> HeraldResult<()> {
        self.post_invalidate(
            &format!(
                "/service/{}/delivery-receipt-api/{}",
                service_id, callback_api_id
            ),
            &json!({"url": url, "bearer_token": bearer_token, "updated_by_id": user_id}),
            InvalidationSet::service_only(service_id),
        )
        .await?;
        Ok(())
    }
}
