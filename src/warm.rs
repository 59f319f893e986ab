//! Startup cache warming
//!
//! Resolves configured templates once so the first real request does not pay
//! load latency, then prefetches each section's backing resource into the
//! raw cache. Warming is best-effort: per-template failures are logged and
//! skipped, and warming never aborts startup.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::PreloadSettings;
use crate::namespace::COMMON_NAMESPACE;
use crate::resolver::{RuntimeData, TemplateResolver};

/// Outcome of a warming pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WarmSummary {
    pub templates_warmed: usize,
    pub templates_failed: usize,
    pub resources_warmed: usize,
}

/// Warm the caches for every template in `preload`
pub fn warm_caches(resolver: &TemplateResolver, preload: &PreloadSettings) -> WarmSummary {
    let mut summary = WarmSummary::default();

    if preload.is_empty() {
        info!("template cache warming skipped (no templates configured)");
        return summary;
    }

    let started = Instant::now();
    info!("starting template cache warming");

    for template_id in &preload.ids {
        warm_one(resolver, COMMON_NAMESPACE, template_id, &mut summary);
    }

    for (namespace, template_ids) in &preload.namespaces {
        for template_id in template_ids {
            warm_one(resolver, namespace, template_id, &mut summary);
        }
    }

    info!(
        warmed = summary.templates_warmed,
        failed = summary.templates_failed,
        resources = summary.resources_warmed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "template cache warming completed"
    );
    summary
}

fn warm_one(
    resolver: &TemplateResolver,
    namespace: &str,
    template_id: &str,
    summary: &mut WarmSummary,
) {
    // Warming has no runtime data; a placeholder failure still counts as
    // warmed because the merged tree is cached before interpolation runs.
    match resolver.resolve(namespace, template_id, &RuntimeData::new()) {
        Ok(resolved) => {
            debug!(namespace, template_id, "warmed template");
            summary.templates_warmed += 1;

            for section in resolved.sections() {
                let Some(path) = section.template_path.as_deref() else {
                    continue;
                };
                match resolver.resource_bytes(path, namespace, None) {
                    Ok(_) => summary.resources_warmed += 1,
                    Err(e) => {
                        warn!(namespace, template_id, resource = path, error = %e,
                            "failed to warm section resource");
                    }
                }
            }
        }
        Err(crate::error::TemplateError::UnresolvedPlaceholder { token, .. }) => {
            debug!(namespace, template_id, token = %token,
                "template warmed up to interpolation (placeholder needs runtime data)");
            summary.templates_warmed += 1;
        }
        Err(e) => {
            warn!(namespace, template_id, error = %e, "failed to warm template");
            summary.templates_failed += 1;
        }
    }
}
