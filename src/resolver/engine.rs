//! The template resolution engine
//!
//! Given a (namespace, template id) pair and runtime data, the resolver walks
//! the inheritance chain, includes fragments, detects cycles, merges, and
//! interpolates placeholders into one self-contained [`ResolvedTemplate`].
//!
//! The engine performs no internal parallelism; each resolve call is
//! sequential recursion, but many calls may run concurrently against the
//! shared caches. Cycle-detection state lives in a per-call
//! [`LoadingContext`] threaded through the recursion, never in shared state.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::cache::{CacheConfig, TtlCache};
use crate::error::TemplateError;
use crate::model::{DocumentTemplate, ResolvedTemplate};
use crate::namespace::{
    normalize_namespace, resolve_resource_path, resolve_template_path, CanonicalPath,
};
use crate::store::ResourceStore;

use super::context::LoadingContext;
use super::interpolate::{interpolate_template, RuntimeData};
use super::merge::merge_templates;

/// Resolves logical template identifiers into fully merged templates
///
/// Owns the two process-wide caches: merged (uninterpolated) template trees
/// and raw resource bytes, both keyed by canonical path. The raw-resource
/// cache is shared with render backends through
/// [`resource_bytes`](Self::resource_bytes).
pub struct TemplateResolver {
    store: Arc<dyn ResourceStore>,
    template_cache: TtlCache<Arc<DocumentTemplate>>,
    resource_cache: TtlCache<Arc<Vec<u8>>>,
}

impl TemplateResolver {
    /// Create a resolver with default cache settings
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self::with_cache_config(store, CacheConfig::default())
    }

    /// Create a resolver with explicit cache settings
    pub fn with_cache_config(store: Arc<dyn ResourceStore>, config: CacheConfig) -> Self {
        Self {
            store,
            template_cache: TtlCache::new(config.template_capacity, config.template_ttl),
            resource_cache: TtlCache::new(config.resource_capacity, config.resource_ttl),
        }
    }

    /// Resolve a template and interpolate placeholders against `data`
    pub fn resolve(
        &self,
        namespace: &str,
        template_id: &str,
        data: &RuntimeData,
    ) -> Result<ResolvedTemplate, TemplateError> {
        self.resolve_with_deadline(namespace, template_id, data, None)
    }

    /// Resolve with a caller-supplied deadline bounding blocking fetches
    ///
    /// On timeout the call fails with a `ResourceRead` whose source is
    /// `TimedOut`, distinguishable from a definitive not-found.
    pub fn resolve_with_deadline(
        &self,
        namespace: &str,
        template_id: &str,
        data: &RuntimeData,
        deadline: Option<Instant>,
    ) -> Result<ResolvedTemplate, TemplateError> {
        let namespace = normalize_namespace(namespace);
        let canonical = resolve_template_path(namespace, template_id);

        let merged = match self.template_cache.get(&canonical) {
            Some(cached) => {
                debug!(path = %canonical, "template cache hit");
                cached
            }
            None => {
                let mut ctx = LoadingContext::new();
                let merged = self
                    .load_merged(&canonical, &mut ctx, deadline)
                    .map_err(|e| match e {
                        // A definitive miss of the requested template itself is
                        // NotFound; read failures deeper in the chain propagate
                        // unchanged.
                        TemplateError::ResourceRead { path, source }
                            if path == canonical && source.is_not_found() =>
                        {
                            TemplateError::NotFound {
                                namespace: namespace.to_string(),
                                template_id: template_id.to_string(),
                            }
                        }
                        other => other,
                    })?;
                self.template_cache.put(canonical.clone(), merged.clone());
                merged
            }
        };

        // Interpolation runs per request: runtime data may differ between
        // calls for the same template, so only the uninterpolated tree is
        // cached.
        let mut working = (*merged).clone();
        interpolate_template(&mut working, data)?;

        Ok(ResolvedTemplate::new(
            working.template_id,
            working.sections,
            working.metadata,
        ))
    }

    /// Fetch raw bytes for a resource path, resolved against
    /// `current_namespace` with the usual cross-namespace rules
    ///
    /// This is the re-resolution surface for render backends: fonts, images,
    /// and section assets referenced outside the template tree resolve
    /// through the same router and share the raw-resource cache.
    pub fn resource_bytes(
        &self,
        resource_path: &str,
        current_namespace: &str,
        deadline: Option<Instant>,
    ) -> Result<Arc<Vec<u8>>, TemplateError> {
        let canonical = resolve_resource_path(resource_path, current_namespace);
        self.fetch_bytes(&canonical, deadline)
    }

    /// Evict a template id from both caches
    pub fn invalidate(&self, namespace: &str, template_id: &str) {
        let canonical = resolve_template_path(namespace, template_id);
        self.invalidate_path(&canonical);
    }

    /// Evict an already-canonical path from both caches
    pub fn invalidate_path(&self, path: &CanonicalPath) {
        self.template_cache.invalidate(path);
        self.resource_cache.invalidate(path);
        debug!(path = %path, "evicted from caches");
    }

    /// Load the fully merged (but uninterpolated) template at `canonical`
    ///
    /// Cache hits return immediately and bypass cycle tracking: a cached
    /// value is already fully resolved, so it cannot extend a cycle.
    fn load_merged(
        &self,
        canonical: &CanonicalPath,
        ctx: &mut LoadingContext,
        deadline: Option<Instant>,
    ) -> Result<Arc<DocumentTemplate>, TemplateError> {
        if let Some(cached) = self.template_cache.get(canonical) {
            debug!(path = %canonical, "template cache hit (nested)");
            return Ok(cached);
        }

        if ctx.contains(canonical) {
            return Err(TemplateError::CircularReference {
                chain: ctx.chain_with(canonical),
            });
        }

        ctx.push(canonical.clone());
        let result = self.load_inner(canonical, ctx, deadline);
        ctx.pop();
        result
    }

    fn load_inner(
        &self,
        canonical: &CanonicalPath,
        ctx: &mut LoadingContext,
        deadline: Option<Instant>,
    ) -> Result<Arc<DocumentTemplate>, TemplateError> {
        let bytes = self.fetch_bytes(canonical, deadline)?;

        let template = DocumentTemplate::from_yaml(&bytes).map_err(|e| TemplateError::Parse {
            path: canonical.clone(),
            message: e.to_string(),
        })?;

        let current_namespace = canonical.namespace().to_string();

        // Inheritance chain first: the child overlays its base.
        let mut working = match &template.base_template_id {
            Some(base_id) => {
                let base_path = resolve_resource_path(base_id, &current_namespace);
                debug!(path = %canonical, base = %base_path, "resolving base template");
                let base = self.load_merged(&base_path, ctx, deadline)?;
                merge_templates(&base, &template)
            }
            None => template,
        };

        // Fragments append in declaration order. A fragment may redirect to
        // the shared namespace via the common: marker for that one reference.
        let fragment_refs = std::mem::take(&mut working.fragments);
        for fragment_ref in &fragment_refs {
            let fragment_path = resolve_resource_path(fragment_ref, &current_namespace);
            debug!(path = %canonical, fragment = %fragment_path, "including fragment");
            let fragment = self.load_merged(&fragment_path, ctx, deadline)?;

            for section in &fragment.sections {
                if working.section(&section.section_id).is_some() {
                    // Fragments model composition, not override: a colliding
                    // id is logged and the fragment section skipped.
                    warn!(
                        template = %canonical,
                        fragment = %fragment_path,
                        section_id = %section.section_id,
                        "fragment section id collides with existing section; skipping"
                    );
                    continue;
                }
                working.sections.push(section.clone());
            }
        }

        working.exclude_section_ids.clear();
        Ok(Arc::new(working))
    }

    /// Fetch raw bytes through the resource cache, then the store chain
    fn fetch_bytes(
        &self,
        canonical: &CanonicalPath,
        deadline: Option<Instant>,
    ) -> Result<Arc<Vec<u8>>, TemplateError> {
        if let Some(bytes) = self.resource_cache.get(canonical) {
            debug!(path = %canonical, "resource cache hit");
            return Ok(bytes);
        }

        let bytes = self
            .store
            .fetch(canonical, deadline)
            .map(Arc::new)
            .map_err(|source| TemplateError::ResourceRead {
                path: canonical.clone(),
                source,
            })?;

        self.resource_cache.put(canonical.clone(), bytes.clone());
        Ok(bytes)
    }
}
