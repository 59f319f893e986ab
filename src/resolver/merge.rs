//! Deterministic template merging
//!
//! The merge is a total reducer: the same base and child always produce the
//! same output, independent of map iteration order (field maps are ordered).
//! Section identity is `section_id`; merging never duplicates a section, only
//! overrides it in place or appends new ones.

use crate::model::{DocumentTemplate, FieldMappingGroup, PageSection};

/// Merge a child template onto its inheritance base
///
/// - `template_id` and other top-level scalars: child wins.
/// - Sections: base order is preserved; a child section with a matching id
///   replaces the base section in place via [`merge_sections`]; child-only
///   sections append in child order.
/// - Metadata: key overlay, child wins.
/// - Section ids listed in the child's `exclude_section_ids` are removed from
///   the merged result.
pub fn merge_templates(base: &DocumentTemplate, child: &DocumentTemplate) -> DocumentTemplate {
    let mut sections: Vec<PageSection> = Vec::with_capacity(base.sections.len());

    for base_section in &base.sections {
        match child.section(&base_section.section_id) {
            Some(child_section) => sections.push(merge_sections(base_section, child_section)),
            None => sections.push(base_section.clone()),
        }
    }

    for child_section in &child.sections {
        if base.section(&child_section.section_id).is_none() {
            sections.push(child_section.clone());
        }
    }

    if !child.exclude_section_ids.is_empty() {
        sections.retain(|s| !child.exclude_section_ids.contains(&s.section_id));
    }

    let mut metadata = base.metadata.clone();
    for (key, value) in &child.metadata {
        metadata.insert(key.clone(), value.clone());
    }

    DocumentTemplate {
        template_id: child.template_id.clone(),
        base_template_id: None,
        sections,
        // Fragments are resolved by the engine, not inherited through merge.
        fragments: child.fragments.clone(),
        exclude_section_ids: Vec::new(),
        metadata,
    }
}

/// Merge two sections sharing a `section_id`
///
/// Scalars (kind, template path, condition, order) take the child's value when
/// set, else the base's. Absence in the base never suppresses presence in the
/// child, so a child can supply a `template_path` its base omits, or inherit
/// the base's path while overriding only mappings.
pub fn merge_sections(base: &PageSection, child: &PageSection) -> PageSection {
    let mut merged = PageSection {
        section_id: child.section_id.clone(),
        kind: child.kind,
        template_path: child
            .template_path
            .clone()
            .or_else(|| base.template_path.clone()),
        condition: child.condition.clone().or_else(|| base.condition.clone()),
        order: child.order.or(base.order),
        field_mappings: base.field_mappings.clone(),
        mapping_groups: Vec::new(),
    };

    // Field maps overlay by field name: child wins, base-only keys survive.
    for (field, expr) in &child.field_mappings {
        merged.field_mappings.insert(field.clone(), expr.clone());
    }

    let common = base.mapping_groups.len().min(child.mapping_groups.len());
    for i in 0..common {
        merged
            .mapping_groups
            .push(merge_groups(&base.mapping_groups[i], &child.mapping_groups[i]));
    }
    merged
        .mapping_groups
        .extend(base.mapping_groups.iter().skip(common).cloned());
    merged
        .mapping_groups
        .extend(child.mapping_groups.iter().skip(common).cloned());

    merged
}

/// Merge two mapping groups occupying the same slot
///
/// The group's `fields` map is the unit of override: child entries overlay
/// base entries by field name; `field_styles` merge the same way.
fn merge_groups(base: &FieldMappingGroup, child: &FieldMappingGroup) -> FieldMappingGroup {
    let mut fields = base.fields.clone();
    for (name, expr) in &child.fields {
        fields.insert(name.clone(), expr.clone());
    }

    let mut field_styles = base.field_styles.clone();
    for (name, style) in &child.field_styles {
        field_styles.insert(name.clone(), style.clone());
    }

    FieldMappingGroup {
        mapping_kind: child.mapping_kind,
        base_path: child.base_path.clone().or_else(|| base.base_path.clone()),
        fields,
        field_styles,
        default_style: child
            .default_style
            .clone()
            .or_else(|| base.default_style.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SectionKind;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn section(id: &str, path: Option<&str>) -> PageSection {
        PageSection {
            section_id: id.to_string(),
            kind: SectionKind::Acroform,
            template_path: path.map(str::to_string),
            condition: None,
            order: None,
            field_mappings: BTreeMap::new(),
            mapping_groups: Vec::new(),
        }
    }

    fn template(id: &str, sections: Vec<PageSection>) -> DocumentTemplate {
        DocumentTemplate {
            template_id: id.to_string(),
            base_template_id: None,
            sections,
            fragments: Vec::new(),
            exclude_section_ids: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn test_child_id_wins() {
        let base = template("base", vec![]);
        let child = template("child", vec![]);
        assert_eq!(merge_templates(&base, &child).template_id, "child");
    }

    #[test]
    fn test_section_order_base_first_then_child_additions() {
        let base = template("base", vec![section("s1", None), section("s2", None)]);
        let child = template("child", vec![section("s3", None), section("s1", None)]);

        let merged = merge_templates(&base, &child);
        let ids: Vec<&str> = merged.sections.iter().map(|s| s.section_id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2", "s3"]);
    }

    #[test]
    fn test_field_overlay_child_wins_base_survives() {
        let mut base_section = section("s1", Some("base.pdf"));
        base_section
            .field_mappings
            .insert("field1".into(), "$.base.field1".into());
        base_section
            .field_mappings
            .insert("field2".into(), "$.base.field2".into());

        let mut child_section = section("s1", None);
        child_section
            .field_mappings
            .insert("field1".into(), "$.child.field1".into());
        child_section
            .field_mappings
            .insert("field3".into(), "$.child.field3".into());

        let merged = merge_sections(&base_section, &child_section);
        assert_eq!(merged.field_mappings["field1"], "$.child.field1");
        assert_eq!(merged.field_mappings["field2"], "$.base.field2");
        assert_eq!(merged.field_mappings["field3"], "$.child.field3");
        // Child omitted the path, so the base's is inherited.
        assert_eq!(merged.template_path.as_deref(), Some("base.pdf"));
    }

    #[test]
    fn test_child_path_propagates_when_base_omits() {
        let base_section = section("sec1", None);
        let child_section = section("sec1", Some("forms/child-form.pdf"));

        let merged = merge_sections(&base_section, &child_section);
        assert_eq!(merged.template_path.as_deref(), Some("forms/child-form.pdf"));
    }

    #[test]
    fn test_group_fields_overlay() {
        let mut base_section = section("s1", None);
        base_section.mapping_groups.push(FieldMappingGroup {
            base_path: Some("applicants[0]".into()),
            fields: BTreeMap::from([
                ("a".to_string(), "base.a".to_string()),
                ("b".to_string(), "base.b".to_string()),
            ]),
            ..Default::default()
        });

        let mut child_section = section("s1", None);
        child_section.mapping_groups.push(FieldMappingGroup {
            fields: BTreeMap::from([("b".to_string(), "child.b".to_string())]),
            ..Default::default()
        });

        let merged = merge_sections(&base_section, &child_section);
        let group = &merged.mapping_groups[0];
        assert_eq!(group.fields["a"], "base.a");
        assert_eq!(group.fields["b"], "child.b");
        // base_path inherited from the base group.
        assert_eq!(group.base_path.as_deref(), Some("applicants[0]"));
    }

    #[test]
    fn test_exclusions_prune_inherited_sections() {
        let base = template("base", vec![section("s1", None), section("s2", None)]);
        let mut child = template("child", vec![section("s3", None)]);
        child.exclude_section_ids.push("s2".into());

        let merged = merge_templates(&base, &child);
        let ids: Vec<&str> = merged.sections.iter().map(|s| s.section_id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s3"]);
        assert!(merged.exclude_section_ids.is_empty());
    }

    #[test]
    fn test_metadata_overlay() {
        let mut base = template("base", vec![]);
        base.metadata.insert("a".into(), "base-a".into());
        base.metadata.insert("b".into(), "base-b".into());
        let mut child = template("child", vec![]);
        child.metadata.insert("b".into(), "child-b".into());

        let merged = merge_templates(&base, &child);
        assert_eq!(merged.metadata["a"], "base-a");
        assert_eq!(merged.metadata["b"], "child-b");
    }

    #[test]
    fn test_merge_is_deterministic() {
        let base = template("base", vec![section("s1", Some("x.pdf")), section("s2", None)]);
        let child = template("child", vec![section("s2", Some("y.pdf"))]);

        let first = merge_templates(&base, &child);
        let second = merge_templates(&base, &child);
        assert_eq!(first, second);
    }
}
