//! Namespace-aware path resolution for tenant template folders
//!
//! Every template and resource lives under `{namespace}/templates/{relative-id}`.
//! A namespace is an opaque tenant identifier; the reserved `common-templates`
//! namespace owns fragments and assets shared across tenants. A resource
//! reference prefixed with `common:` resolves against the shared namespace
//! regardless of the tenant currently in scope, for that one reference only.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The shared namespace that owns cross-tenant templates and fragments
pub const COMMON_NAMESPACE: &str = "common-templates";

/// Fixed folder name under each namespace
pub const TEMPLATES_FOLDER: &str = "templates";

/// Marker prefix redirecting a single reference to the shared namespace
pub const COMMON_PREFIX: &str = "common:";

/// A fully qualified resource path: `{namespace}/templates/{relative-id}`
///
/// Canonical paths are the cache key for both the template cache and the
/// raw-resource cache, and the unit of circular-reference detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The namespace segment of this path
    pub fn namespace(&self) -> &str {
        match self.0.split_once('/') {
            Some((first, _)) if first != TEMPLATES_FOLDER => first,
            _ => COMMON_NAMESPACE,
        }
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a namespace name: trim whitespace, default blank to the shared
/// namespace constant
pub fn normalize_namespace(namespace: &str) -> &str {
    let trimmed = namespace.trim();
    if trimmed.is_empty() {
        COMMON_NAMESPACE
    } else {
        trimmed
    }
}

/// Resolve a template id within a namespace to its canonical path
///
/// ```
/// use docweave::namespace::resolve_template_path;
///
/// let path = resolve_template_path("tenant-a", "enrollment-form.yaml");
/// assert_eq!(path.as_str(), "tenant-a/templates/enrollment-form.yaml");
/// ```
pub fn resolve_template_path(namespace: &str, template_id: &str) -> CanonicalPath {
    let namespace = normalize_namespace(namespace);
    CanonicalPath(format!("{namespace}/{TEMPLATES_FOLDER}/{template_id}"))
}

/// Resolve a resource path within the current namespace, honoring the
/// cross-namespace marker
///
/// A leading `templates/` is stripped first so that re-resolving an
/// already-relative path is idempotent. A `common:` prefix redirects the
/// reference to the shared namespace and is removed.
pub fn resolve_resource_path(resource_path: &str, current_namespace: &str) -> CanonicalPath {
    let normalized = resource_path
        .strip_prefix("templates/")
        .unwrap_or(resource_path);

    if let Some(shared) = normalized.strip_prefix(COMMON_PREFIX) {
        return resolve_template_path(COMMON_NAMESPACE, shared);
    }

    resolve_template_path(current_namespace, normalized)
}

/// Whether a reference carries the cross-namespace marker
pub fn is_cross_namespace(resource_path: &str) -> bool {
    resource_path.starts_with(COMMON_PREFIX)
}

/// Strip the cross-namespace marker if present
pub fn strip_cross_namespace(resource_path: &str) -> &str {
    resource_path
        .strip_prefix(COMMON_PREFIX)
        .unwrap_or(resource_path)
}

/// Extract the namespace from an already-canonical path
///
/// The first segment is the namespace unless it equals the fixed folder name,
/// in which case the path is unnamespaced and defaults to the shared
/// namespace.
pub fn extract_namespace_from_path(path: &str) -> &str {
    match path.split_once('/') {
        Some((first, _)) if !first.is_empty() && first != TEMPLATES_FOLDER => first,
        _ => COMMON_NAMESPACE,
    }
}
