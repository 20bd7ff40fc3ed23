//! Service creation and update request types.

use chrono::{DateTime, Utc};
use herald_core::{HeraldError, HeraldResult, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// The service attributes a generic update call may set.
///
/// Updates arriving from typed code are constrained by [`ServiceUpdate`]'s
/// fields; this list exists for payloads crossing less-typed boundaries
/// (form posts), checked by [`validate_update_attributes`] before any
/// network call.
pub const ALLOWED_SERVICE_ATTRIBUTES: [&str; 23] = [
    "active",
    "consent_to_research",
    "contact_link",
    "count_as_live",
    "email_branding",
    "email_from",
    "free_sms_fragment_limit",
    "go_live_at",
    "go_live_user",
    "letter_branding",
    "letter_contact_block",
    "name",
    "notes",
    "organisation_type",
    "permissions",
    "prefix_sms",
    "rate_limit",
    "reply_to_email_address",
    "restricted",
    "sms_sender",
    "volume_email",
    "volume_letter",
    "volume_sms",
];

/// Rejects any attribute name outside the allow-list, naming every
/// offender.
pub fn validate_update_attributes<'a, I>(attributes: I) -> HeraldResult<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let disallowed: Vec<String> = attributes
        .into_iter()
        .filter(|attribute| !ALLOWED_SERVICE_ATTRIBUTES.contains(attribute))
        .map(ToString::to_string)
        .collect();

    if disallowed.is_empty() {
        Ok(())
    } else {
        Err(HeraldError::disallowed_attributes(disallowed))
    }
}

/// Request body for creating a service.
///
/// `service_name` is coerced to the remote API's `name` field when the
/// body is built; the client injects `created_by` and `active` itself.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, message = "Service name is required"))]
    pub service_name: String,
    pub organisation_type: String,
    pub email_message_limit: u64,
    pub sms_message_limit: u64,
    pub letter_message_limit: u64,
    pub restricted: bool,
    pub user_id: UserId,
    #[validate(length(min = 1, message = "Sender address is required"))]
    pub email_from: String,
}

/// A partial update of a service.
///
/// The fields are exactly the allow-listed attributes; unset fields are
/// omitted from the request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_to_research: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_as_live: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_branding: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_sms_fragment_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go_live_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go_live_user: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_branding: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_contact_block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_sms: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_sender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_email: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_letter: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_sms: Option<u64>,
}
