//! Cache key generators for consistent key naming.
//!
//! Every key for a service's template family is a syntactic match of
//! [`service_template_pattern`], so one pattern delete evicts the whole
//! family.

use herald_core::{ServiceId, TemplateId, UserId};

/// Generate a cache key for a service.
#[must_use]
pub fn service(id: ServiceId) -> String {
    format!("service-{}", id)
}

/// Generate a cache key for a service's template list.
#[must_use]
pub fn service_templates(id: ServiceId) -> String {
    format!("service-{}-templates", id)
}

/// Generate a cache key for one template at one version.
///
/// The unversioned read caches under the `latest` qualifier so it never
/// collides with a pinned-version read of the same template.
#[must_use]
pub fn service_template(id: ServiceId, template_id: TemplateId, version: Option<u32>) -> String {
    match version {
        Some(version) => format!("service-{}-template-{}-version-{}", id, template_id, version),
        None => format!("service-{}-template-{}-version-latest", id, template_id),
    }
}

/// Generate a cache key for a template's version history.
#[must_use]
pub fn service_template_versions(id: ServiceId, template_id: TemplateId) -> String {
    format!("service-{}-template-{}-versions", id, template_id)
}

/// Generate a cache key for a service's returned-letter summary.
#[must_use]
pub fn returned_letter_summary(id: ServiceId) -> String {
    format!("service-{}-returned-letters-summary", id)
}

/// Generate a cache key for a service's returned-letter statistics.
#[must_use]
pub fn returned_letter_statistics(id: ServiceId) -> String {
    format!("service-{}-returned-letters-statistics", id)
}

/// Generate a cache key for a user.
#[must_use]
pub fn user(id: UserId) -> String {
    format!("user-{}", id)
}

/// Pattern matching every per-template and per-version cache entry of a
/// service.
#[must_use]
pub fn service_template_pattern(id: ServiceId) -> String {
    format!("service-{}-template-*", id)
}
