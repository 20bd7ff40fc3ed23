//! Request body types for the mutating operations.

mod broadcast;
mod guest_list;
mod service;
mod template;

pub use broadcast::BroadcastSettings;
pub use guest_list::GuestListUpdate;
pub use service::{
    validate_update_attributes, CreateServiceRequest, ServiceUpdate, ALLOWED_SERVICE_ATTRIBUTES,
};
pub use template::{NewTemplate, TemplateType, TemplateUpdate};

use herald_core::{HeraldError, HeraldResult};
use serde_json::{Map, Value};
use validator::Validate;

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `HeraldError` on failure.
    fn validate_request(&self) -> HeraldResult<()> {
        self.validate().map_err(|errors| {
            let message = errors
                .field_errors()
                .iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |error| {
                        let detail = error
                            .message
                            .as_ref()
                            .map_or_else(|| error.code.to_string(), ToString::to_string);
                        format!("{}: {}", field, detail)
                    })
                })
                .collect::<Vec<_>>()
                .join("; ");
            HeraldError::Validation(message)
        })
    }
}

impl<T: Validate> ValidateExt for T {}

/// Serializes a request type into the JSON object its endpoint expects.
pub(crate) fn to_object<T: serde::Serialize>(value: &T) -> HeraldResult<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(HeraldError::internal(format!(
            "Request body serialized to a non-object: {}",
            other
        ))),
    }
}
