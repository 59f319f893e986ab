//! Integration tests for fragment inclusion and cross-namespace references

use std::sync::Arc;

use pretty_assertions::assert_eq;

use docweave::namespace::resolve_template_path;
use docweave::store::BundledStore;
use docweave::{RuntimeData, TemplateResolver};

fn resolver_with(entries: &[(&str, &str, &str)]) -> TemplateResolver {
    let store = Arc::new(BundledStore::new());
    for (namespace, id, yaml) in entries {
        store.insert(
            resolve_template_path(namespace, id),
            yaml.as_bytes().to_vec(),
        );
    }
    TemplateResolver::new(store)
}

#[test]
fn test_common_fragment_appends_after_own_sections() {
    let resolver = resolver_with(&[
        (
            "tenant-a",
            "template-with-common-fragment.yaml",
            "templateId: with-common-fragment\nfragments:\n  - common:footer.yaml\nsections:\n  - sectionId: main\n    type: ACROFORM\n    templatePath: forms/main.pdf\n",
        ),
        (
            "common-templates",
            "footer.yaml",
            "templateId: footer\nsections:\n  - sectionId: footer\n    type: HTML\n    templatePath: footer.html\n",
        ),
    ]);

    let resolved = resolver
        .resolve(
            "tenant-a",
            "template-with-common-fragment.yaml",
            &RuntimeData::new(),
        )
        .expect("should resolve");

    // Fragment sections come from the shared namespace regardless of the
    // tenant, appended after the tenant's own sections.
    let ids: Vec<&str> = resolved
        .sections()
        .iter()
        .map(|s| s.section_id.as_str())
        .collect();
    assert_eq!(ids, vec!["main", "footer"]);
}

#[test]
fn test_fragment_marker_does_not_change_ambient_namespace() {
    // The common: marker redirects one reference only; the sibling fragment
    // still resolves from the tenant's namespace.
    let resolver = resolver_with(&[
        (
            "tenant-a",
            "composite.yaml",
            "templateId: composite\nfragments:\n  - common:shared.yaml\n  - local.yaml\nsections: []\n",
        ),
        (
            "common-templates",
            "shared.yaml",
            "templateId: shared\nsections:\n  - sectionId: shared\n    type: HTML\n",
        ),
        (
            "tenant-a",
            "local.yaml",
            "templateId: local\nsections:\n  - sectionId: local\n    type: HTML\n",
        ),
    ]);

    let resolved = resolver
        .resolve("tenant-a", "composite.yaml", &RuntimeData::new())
        .expect("should resolve");

    let ids: Vec<&str> = resolved
        .sections()
        .iter()
        .map(|s| s.section_id.as_str())
        .collect();
    assert_eq!(ids, vec!["shared", "local"]);
}

#[test]
fn test_fragments_append_in_declaration_order() {
    let resolver = resolver_with(&[
        (
            "tenant-a",
            "ordered.yaml",
            "templateId: ordered\nfragments:\n  - frag-b.yaml\n  - frag-a.yaml\nsections:\n  - sectionId: own\n    type: ACROFORM\n",
        ),
        (
            "tenant-a",
            "frag-a.yaml",
            "templateId: frag-a\nsections:\n  - sectionId: from-a\n    type: HTML\n",
        ),
        (
            "tenant-a",
            "frag-b.yaml",
            "templateId: frag-b\nsections:\n  - sectionId: from-b\n    type: HTML\n",
        ),
    ]);

    let resolved = resolver
        .resolve("tenant-a", "ordered.yaml", &RuntimeData::new())
        .expect("should resolve");

    let ids: Vec<&str> = resolved
        .sections()
        .iter()
        .map(|s| s.section_id.as_str())
        .collect();
    assert_eq!(ids, vec!["own", "from-b", "from-a"]);
}

#[test]
fn test_colliding_fragment_section_is_skipped() {
    let resolver = resolver_with(&[
        (
            "tenant-a",
            "main.yaml",
            "templateId: main\nfragments:\n  - frag.yaml\nsections:\n  - sectionId: main\n    type: ACROFORM\n    templatePath: own.pdf\n",
        ),
        (
            "tenant-a",
            "frag.yaml",
            "templateId: frag\nsections:\n  - sectionId: main\n    type: HTML\n    templatePath: conflicting.html\n  - sectionId: extra\n    type: HTML\n",
        ),
    ]);

    let resolved = resolver
        .resolve("tenant-a", "main.yaml", &RuntimeData::new())
        .expect("conflict is recoverable");

    // The colliding fragment section is dropped, the rest of the fragment
    // still lands, and the original section is untouched.
    let ids: Vec<&str> = resolved
        .sections()
        .iter()
        .map(|s| s.section_id.as_str())
        .collect();
    assert_eq!(ids, vec!["main", "extra"]);
    assert_eq!(
        resolved.section("main").unwrap().template_path.as_deref(),
        Some("own.pdf")
    );
}

#[test]
fn test_fragment_with_its_own_inheritance() {
    // A fragment is itself fully resolved (base chain included) before its
    // sections are appended.
    let resolver = resolver_with(&[
        (
            "tenant-a",
            "main.yaml",
            "templateId: main\nfragments:\n  - frag-child.yaml\nsections:\n  - sectionId: own\n    type: ACROFORM\n",
        ),
        (
            "tenant-a",
            "frag-base.yaml",
            "templateId: frag-base\nsections:\n  - sectionId: inherited\n    type: HTML\n    templatePath: inherited.html\n",
        ),
        (
            "tenant-a",
            "frag-child.yaml",
            "templateId: frag-child\nbaseTemplateId: frag-base.yaml\nsections:\n  - sectionId: added\n    type: HTML\n",
        ),
    ]);

    let resolved = resolver
        .resolve("tenant-a", "main.yaml", &RuntimeData::new())
        .expect("should resolve");

    let ids: Vec<&str> = resolved
        .sections()
        .iter()
        .map(|s| s.section_id.as_str())
        .collect();
    assert_eq!(ids, vec!["own", "inherited", "added"]);
}

#[test]
fn test_common_base_template() {
    let resolver = resolver_with(&[
        (
            "tenant-a",
            "branded.yaml",
            "templateId: branded\nbaseTemplateId: common:base-enrollment.yaml\nsections:\n  - sectionId: branding\n    type: HTML\n",
        ),
        (
            "common-templates",
            "base-enrollment.yaml",
            "templateId: base-enrollment\nsections:\n  - sectionId: enrollment\n    type: ACROFORM\n    templatePath: forms/enrollment.pdf\n",
        ),
    ]);

    let resolved = resolver
        .resolve("tenant-a", "branded.yaml", &RuntimeData::new())
        .expect("should resolve");

    let ids: Vec<&str> = resolved
        .sections()
        .iter()
        .map(|s| s.section_id.as_str())
        .collect();
    assert_eq!(ids, vec!["enrollment", "branding"]);
}
