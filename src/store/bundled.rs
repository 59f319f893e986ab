//! In-memory store for bundled default resources

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;

use crate::namespace::CanonicalPath;

use super::{FetchError, ResourceStore};

/// A store backed by an in-memory map of canonical path to bytes
///
/// Serves the defaults compiled or loaded into the process at startup. Also
/// the store of choice in tests, where `insert` doubles as a way to mutate
/// backing bytes between resolutions.
#[derive(Debug, Default)]
pub struct BundledStore {
    entries: RwLock<HashMap<CanonicalPath, Vec<u8>>>,
}

impl BundledStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the bytes for a path
    pub fn insert(&self, path: CanonicalPath, bytes: impl Into<Vec<u8>>) {
        self.entries
            .write()
            .expect("bundled store lock poisoned")
            .insert(path, bytes.into());
    }

    /// Remove the bytes for a path
    pub fn remove(&self, path: &CanonicalPath) {
        self.entries
            .write()
            .expect("bundled store lock poisoned")
            .remove(path);
    }

    /// Number of bundled resources
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .expect("bundled store lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceStore for BundledStore {
    fn fetch(&self, path: &CanonicalPath, deadline: Option<Instant>) -> Result<Vec<u8>, FetchError> {
        super::check_deadline(path, deadline)?;
        self.entries
            .read()
            .expect("bundled store lock poisoned")
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound { path: path.clone() })
    }

    fn name(&self) -> &str {
        "bundled"
    }
}
