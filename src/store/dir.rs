//! Local-disk override store

use std::path::PathBuf;
use std::time::Instant;

use crate::namespace::CanonicalPath;

use super::{FetchError, ResourceStore};

/// A store reading `{root}/{canonical-path}` from the local filesystem
///
/// Sits between bundled defaults and any remote store in the backend chain,
/// letting operators override individual templates on disk without a rebuild.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl ResourceStore for DirStore {
    fn fetch(&self, path: &CanonicalPath, deadline: Option<Instant>) -> Result<Vec<u8>, FetchError> {
        super::check_deadline(path, deadline)?;

        let full = self.root.join(path.as_str());
        match std::fs::read(&full) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::NotFound { path: path.clone() })
            }
            Err(e) => Err(FetchError::Io {
                path: path.clone(),
                source: e,
            }),
        }
    }

    fn name(&self) -> &str {
        "local-dir"
    }
}
