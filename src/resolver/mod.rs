//! Template resolution: inheritance merging, fragment inclusion, cycle
//! detection, and placeholder interpolation
//!
//! The pipeline for one resolve call:
//!
//! 1. Canonical path via the namespace router; template-cache hit returns
//!    immediately.
//! 2. Cycle check against the call-scoped [`LoadingContext`], before any I/O.
//! 3. Fetch bytes (raw-resource cache, then the store chain) and parse YAML.
//! 4. Recursively resolve the inheritance base and merge child-over-base.
//! 5. Recursively resolve fragments and append their sections.
//! 6. Cache the merged tree, interpolate `${name}` placeholders per request.

mod context;
mod engine;
mod interpolate;
mod merge;

pub use context::LoadingContext;
pub use engine::TemplateResolver;
pub use interpolate::{interpolate_template, RuntimeData};
pub use merge::{merge_sections, merge_templates};
