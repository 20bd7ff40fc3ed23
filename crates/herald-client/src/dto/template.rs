//! Template request types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// The kind of notification a template renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    Email,
    Sms,
    Letter,
    Broadcast,
}

impl TemplateType {
    /// Returns the wire name of this template type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Letter => "letter",
            Self::Broadcast => "broadcast",
        }
    }
}

/// Request body for creating a template.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTemplate {
    #[validate(length(min = 1, message = "Template name is required"))]
    pub name: String,
    pub template_type: TemplateType,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_folder_id: Option<Uuid>,
}

/// A partial update of an existing template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postage: Option<String>,
}
