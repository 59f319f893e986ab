//! Resource stores: backends that turn a canonical path into raw bytes
//!
//! The resolution engine never touches storage directly; it asks a
//! [`ResourceStore`] for bytes and caches what comes back. Backends are tried
//! in a deterministic order by [`ChainStore`]: bundled defaults first, then a
//! local override store, then any deployment-provided remote store.

mod bundled;
mod chain;
mod dir;

pub use bundled::BundledStore;
pub use chain::ChainStore;
pub use dir::DirStore;

use std::time::Instant;

use thiserror::Error;

use crate::namespace::CanonicalPath;

/// Errors surfaced by a resource store
#[derive(Debug, Error)]
pub enum FetchError {
    /// No backend holds bytes for this path
    #[error("resource not found: {path}")]
    NotFound { path: CanonicalPath },

    /// Backend-level I/O failure
    #[error("error reading resource {path}: {source}")]
    Io {
        path: CanonicalPath,
        #[source]
        source: std::io::Error,
    },

    /// The caller-supplied deadline elapsed before the fetch completed
    #[error("timed out fetching resource: {path}")]
    TimedOut { path: CanonicalPath },

    /// A required remote backend failed; never silently recovered from
    #[error("remote store unavailable for {path}: {message}")]
    RemoteUnavailable { path: CanonicalPath, message: String },
}

impl FetchError {
    /// Whether this failure is definitive (the resource does not exist) as
    /// opposed to transient (the backend could not answer right now)
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

/// Abstract "fetch bytes for a resolved path" capability
///
/// The fetch is the only blocking operation in the resolution pipeline, so it
/// carries the caller's deadline: implementations should give up with
/// [`FetchError::TimedOut`] once the deadline has passed.
pub trait ResourceStore: Send + Sync {
    /// Fetch the raw bytes stored at `path`
    fn fetch(&self, path: &CanonicalPath, deadline: Option<Instant>) -> Result<Vec<u8>, FetchError>;

    /// Short backend name for diagnostics
    fn name(&self) -> &str;
}

/// Returns `TimedOut` if the deadline has already passed
pub(crate) fn check_deadline(
    path: &CanonicalPath,
    deadline: Option<Instant>,
) -> Result<(), FetchError> {
    match deadline {
        Some(d) if Instant::now() >= d => Err(FetchError::TimedOut { path: path.clone() }),
        _ => Ok(()),
    }
}
