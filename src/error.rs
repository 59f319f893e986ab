//! Error types for template resolution

use thiserror::Error;

use crate::namespace::CanonicalPath;
use crate::store::FetchError;

/// Errors fatal to a `resolve` call
///
/// Every variant propagates unchanged to the top-level caller; a partially
/// resolved template is never returned. Fragment section-id conflicts are the
/// one recoverable condition and are logged and skipped rather than raised.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No backend produced bytes for the requested top-level template
    #[error("template not found: {template_id} (namespace: {namespace})")]
    NotFound {
        namespace: String,
        template_id: String,
    },

    /// Malformed template content; never retried
    #[error("failed to parse template {path}: {message}")]
    Parse { path: CanonicalPath, message: String },

    /// The same canonical path reappeared in the active loading chain
    #[error("circular template reference detected: {chain}")]
    CircularReference { chain: String },

    /// An interpolation token had no matching runtime value
    #[error("unresolved placeholder '${{{token}}}' in template {template_id}")]
    UnresolvedPlaceholder { token: String, template_id: String },

    /// Backend-level read failure while loading a base template, fragment, or
    /// section resource
    #[error("failed to read resource {path}")]
    ResourceRead {
        path: CanonicalPath,
        #[source]
        source: FetchError,
    },
}

pub type Result<T> = std::result::Result<T, TemplateError>;
