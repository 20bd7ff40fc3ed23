//! Unified error types for all layers of the client.

use std::collections::HashMap;
use thiserror::Error;

/// Unified error type for Herald.
///
/// Covers local validation failures, structured errors returned by the
/// remote API, and infrastructure failures (cache store, configuration).
#[derive(Error, Debug)]
pub enum HeraldError {
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error raised before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Update payload carries attributes outside the allow-list.
    /// Raised before the request body is built; names every offender.
    #[error("Not allowed to update service attributes: {}", .attributes.join(", "))]
    DisallowedAttributes { attributes: Vec<String> },

    /// Non-2xx response from the remote API. `fields` carries the
    /// structured field→message payload when the failure was a
    /// validation failure, and is empty otherwise.
    #[error("Remote API error ({status}): {message}")]
    RemoteApi {
        status: u16,
        message: String,
        fields: HashMap<String, String>,
    },

    /// Cache store error. Swallowed inside the read/write paths; only
    /// surfaced by direct cache-store calls.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HeraldError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DisallowedAttributes { .. } => "DISALLOWED_ATTRIBUTES",
            Self::RemoteApi { .. } => "REMOTE_API_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a disallowed-attributes error. Attribute names are sorted
    /// so the message is stable regardless of payload iteration order.
    #[must_use]
    pub fn disallowed_attributes(mut attributes: Vec<String>) -> Self {
        attributes.sort();
        Self::DisallowedAttributes { attributes }
    }

    /// Creates a remote API error without a structured field payload.
    #[must_use]
    pub fn remote_api(status: u16, message: impl Into<String>) -> Self {
        Self::RemoteApi {
            status,
            message: message.into(),
            fields: HashMap::new(),
        }
    }

    /// Creates a cache error.
    #[must_use]
    pub fn cache<T: Into<String>>(message: T) -> Self {
        Self::Cache(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the structured field→message payload of a remote
    /// validation failure, if this is one.
    #[must_use]
    pub fn remote_fields(&self) -> Option<&HashMap<String, String>> {
        match self {
            Self::RemoteApi { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }

    /// Checks if this error is retriable.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Cache(_))
            || matches!(self, Self::RemoteApi { status, .. } if *status >= 500)
    }
}

impl From<serde_json::Error> for HeraldError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(HeraldError::not_found("Service", 1).error_code(), "NOT_FOUND");
        assert_eq!(HeraldError::validation("bad input").error_code(), "VALIDATION_ERROR");
        assert_eq!(HeraldError::cache("down").error_code(), "CACHE_ERROR");
        assert_eq!(HeraldError::remote_api(400, "nope").error_code(), "REMOTE_API_ERROR");
        assert_eq!(HeraldError::internal("oops").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_disallowed_attributes_message_names_every_attribute() {
        let err = HeraldError::disallowed_attributes(vec!["foo".to_string()]);
        assert_eq!(
            err.to_string(),
            "Not allowed to update service attributes: foo"
        );

        let err = HeraldError::disallowed_attributes(vec!["zed".to_string(), "bar".to_string()]);
        assert_eq!(
            err.to_string(),
            "Not allowed to update service attributes: bar, zed"
        );
    }

    #[test]
    fn test_remote_fields_accessor() {
        let mut fields = HashMap::new();
        fields.insert("name".to_string(), "Service name error".to_string());
        let err = HeraldError::RemoteApi {
            status: 400,
            message: "validation failed".to_string(),
            fields,
        };
        assert_eq!(
            err.remote_fields().and_then(|f| f.get("name")).map(String::as_str),
            Some("Service name error")
        );

        assert!(HeraldError::remote_api(400, "no fields").remote_fields().is_none());
        assert!(HeraldError::validation("local").remote_fields().is_none());
    }

    #[test]
    fn test_retriable_errors() {
        assert!(HeraldError::cache("connection lost").is_retriable());
        assert!(HeraldError::remote_api(502, "bad gateway").is_retriable());
        assert!(!HeraldError::remote_api(400, "bad request").is_retriable());
        assert!(!HeraldError::validation("bad input").is_retriable());
    }

    #[test]
    fn test_error_constructors() {
        let not_found = HeraldError::not_found("Template", "123");
        assert!(not_found.to_string().contains("Template"));

        let configuration = HeraldError::configuration("missing api key");
        assert!(configuration.to_string().contains("missing api key"));
    }
}
