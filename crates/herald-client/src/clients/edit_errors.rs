//! Translation of remote validation errors to user-facing messages.

use std::collections::HashMap;

/// Known (field, raw message) pairs and their user-facing translations.
const EDIT_SERVICE_ERROR_MESSAGES: [((&str, &str), &str); 2] = [
    (
        ("name", "Service name error"),
        "This service name is already in use",
    ),
    (
        ("email_from", "email_from disallowed characters"),
        "Service name must not include characters from a non-Latin alphabet",
    ),
];

/// Translates the field→message payload of a failed service edit.
///
/// Returns `None` when no table entry matches, signalling the caller to
/// fall back to a generic message. Pure lookup; unrecognized payload
/// shapes simply fail to match.
#[must_use]
pub fn parse_edit_service_error(fields: &HashMap<String, String>) -> Option<&'static str> {
    EDIT_SERVICE_ERROR_MESSAGES
        .iter()
        .find_map(|((field, raw), message)| {
            (fields.get(*field).map(String::as_str) == Some(*raw)).then_some(*message)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(field: &str, message: &str) -> HashMap<String, String> {
        HashMap::from([(field.to_string(), message.to_string())])
    }

    #[test]
    fn test_translates_duplicate_name() {
        assert_eq!(
            parse_edit_service_error(&payload("name", "Service name error")),
            Some("This service name is already in use")
        );
    }

    #[test]
    fn test_translates_disallowed_characters() {
        assert_eq!(
            parse_edit_service_error(&payload("email_from", "email_from disallowed characters")),
            Some("Service name must not include characters from a non-Latin alphabet")
        );
    }

    #[test]
    fn test_unknown_fields_yield_no_message() {
        assert_eq!(parse_edit_service_error(&payload("other", "blah")), None);
        assert_eq!(parse_edit_service_error(&HashMap::new()), None);
    }

    #[test]
    fn test_translation_is_repeatable() {
        let fields = payload("name", "Service name error");
        assert_eq!(
            parse_edit_service_error(&fields),
            parse_edit_service_error(&fields)
        );
    }
}
