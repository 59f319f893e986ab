//! Render backend boundary
//!
//! The resolution engine hands a [`ResolvedTemplate`] to downstream render
//! backends (form-field population, HTML conversion, spreadsheet filling).
//! Backends are selected through an explicit [`BackendRegistry`] built at
//! startup; a declared [`SectionKind`] maps to one statically known
//! implementation, with no runtime name matching.

use std::collections::HashMap;

use thiserror::Error;

use crate::error::TemplateError;
use crate::model::{PageSection, SectionKind};
use crate::resolver::{RuntimeData, TemplateResolver};

/// Errors configuring the backend registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two backends declared the same section kind
    #[error("duplicate render backend for section kind {kind:?}")]
    Duplicate { kind: SectionKind },
}

/// A renderer for one kind of section
///
/// Backends receive the resolver so that resources referenced only by the
/// section (fonts, images, markup includes) re-resolve through the same
/// namespace rules and share the raw-resource cache.
pub trait RenderBackend: Send + Sync {
    /// The section kind this backend handles
    fn kind(&self) -> SectionKind;

    /// Render one section into output bytes
    fn render(
        &self,
        section: &PageSection,
        data: &RuntimeData,
        namespace: &str,
        resolver: &TemplateResolver,
    ) -> Result<Vec<u8>, TemplateError>;
}

/// Startup-built mapping from section kind to render backend
#[derive(Default)]
pub struct BackendRegistry {
    backends: HashMap<SectionKind, Box<dyn RenderBackend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend; rejects a second backend for the same kind
    pub fn register(&mut self, backend: Box<dyn RenderBackend>) -> Result<(), RegistryError> {
        let kind = backend.kind();
        if self.backends.contains_key(&kind) {
            return Err(RegistryError::Duplicate { kind });
        }
        self.backends.insert(kind, backend);
        Ok(())
    }

    /// Look up the backend for a section kind
    pub fn get(&self, kind: SectionKind) -> Option<&dyn RenderBackend> {
        self.backends.get(&kind).map(|b| b.as_ref())
    }

    /// The kinds with a registered backend
    pub fn kinds(&self) -> impl Iterator<Item = SectionKind> + '_ {
        self.backends.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubBackend(SectionKind);

    impl RenderBackend for StubBackend {
        fn kind(&self) -> SectionKind {
            self.0
        }

        fn render(
            &self,
            section: &PageSection,
            _data: &RuntimeData,
            _namespace: &str,
            _resolver: &TemplateResolver,
        ) -> Result<Vec<u8>, TemplateError> {
            Ok(section.section_id.as_bytes().to_vec())
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = BackendRegistry::new();
        registry
            .register(Box::new(StubBackend(SectionKind::Acroform)))
            .expect("should register");

        assert!(registry.get(SectionKind::Acroform).is_some());
        assert!(registry.get(SectionKind::Excel).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let mut registry = BackendRegistry::new();
        registry
            .register(Box::new(StubBackend(SectionKind::Html)))
            .expect("first should register");

        let err = registry
            .register(Box::new(StubBackend(SectionKind::Html)))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Duplicate {
                kind: SectionKind::Html
            }
        ));
    }
}
