//! Docweave - multi-tenant document template resolution and composition
//!
//! This library resolves a logical template identifier, scoped to a tenant
//! namespace, into a fully merged, self-contained template ready for
//! rendering. Templates can inherit from a base template, include fragments
//! from other templates (including cross-tenant shared fragments), and carry
//! `${name}` placeholders resolved against runtime data. Resolution detects
//! circular references, preserves section order exactly, and caches both
//! merged templates and raw resource bytes with TTL and capacity bounds.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use docweave::namespace::resolve_template_path;
//! use docweave::store::BundledStore;
//! use docweave::{RuntimeData, TemplateResolver};
//!
//! let store = Arc::new(BundledStore::new());
//! store.insert(
//!     resolve_template_path("tenant-a", "welcome.yaml"),
//!     b"templateId: welcome\nsections:\n  - sectionId: main\n    type: HTML\n".to_vec(),
//! );
//!
//! let resolver = TemplateResolver::new(store);
//! let resolved = resolver
//!     .resolve("tenant-a", "welcome.yaml", &RuntimeData::new())
//!     .unwrap();
//! assert_eq!(resolved.template_id, "welcome");
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod namespace;
pub mod render;
pub mod resolver;
pub mod store;
pub mod warm;

pub use cache::CacheConfig;
pub use config::EngineConfig;
pub use error::{Result, TemplateError};
pub use model::{DocumentTemplate, PageSection, ResolvedTemplate, SectionKind};
pub use namespace::CanonicalPath;
pub use render::{BackendRegistry, RenderBackend};
pub use resolver::{RuntimeData, TemplateResolver};
pub use store::{BundledStore, ChainStore, DirStore, ResourceStore};
pub use warm::warm_caches;
