//! Ordered multi-backend store

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::namespace::CanonicalPath;

use super::{FetchError, ResourceStore};

/// Tries a deterministic sequence of backends and returns the first success
///
/// A transient failure (I/O, timeout, remote unavailable) from a
/// higher-priority backend does not suppress trying the rest of the chain.
/// If no backend succeeds, the first transient error wins over `NotFound`;
/// only an all-backend definitive miss reports `NotFound`.
#[derive(Default)]
pub struct ChainStore {
    backends: Vec<Arc<dyn ResourceStore>>,
}

impl ChainStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a backend; earlier backends have higher priority
    pub fn push(&mut self, backend: Arc<dyn ResourceStore>) {
        self.backends.push(backend);
    }

    /// Builder-style variant of [`push`](Self::push)
    pub fn with_backend(mut self, backend: Arc<dyn ResourceStore>) -> Self {
        self.push(backend);
        self
    }

    pub fn backend_count(&self) -> usize {
        self.backends.len()
    }
}

impl ResourceStore for ChainStore {
    fn fetch(&self, path: &CanonicalPath, deadline: Option<Instant>) -> Result<Vec<u8>, FetchError> {
        let mut transient: Option<FetchError> = None;

        for backend in &self.backends {
            super::check_deadline(path, deadline)?;

            match backend.fetch(path, deadline) {
                Ok(bytes) => {
                    debug!(path = %path, backend = backend.name(), "resource fetched");
                    return Ok(bytes);
                }
                Err(e) if e.is_not_found() => {
                    debug!(path = %path, backend = backend.name(), "resource not in backend");
                }
                Err(e) => {
                    warn!(path = %path, backend = backend.name(), error = %e,
                        "backend failed, trying next");
                    transient.get_or_insert(e);
                }
            }
        }

        Err(transient.unwrap_or_else(|| FetchError::NotFound { path: path.clone() }))
    }

    fn name(&self) -> &str {
        "chain"
    }
}
