//! Template data model
//!
//! Templates are YAML documents describing an ordered list of page sections,
//! an optional inheritance parent (`baseTemplateId`), fragment inclusions, and
//! placeholder metadata. Field names follow the camelCase wire format.
//!
//! An unresolved [`DocumentTemplate`] is immutable once parsed; the resolution
//! engine merges it with its inheritance chain and fragments into a
//! [`ResolvedTemplate`], which is immutable thereafter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Render-backend discriminator for a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SectionKind {
    /// PDF form-field population
    Acroform,
    /// HTML/PDF conversion of a markup template
    Html,
    /// Spreadsheet population via named ranges
    Excel,
}

/// Mapping strategy for a group of field mappings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MappingKind {
    /// Field values are plain data paths
    #[default]
    Direct,
    /// Field values are evaluated expressions
    Expression,
}

/// Text alignment for form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TextAlignment {
    Left,
    Center,
    Right,
}

/// Styling for a populated form field
///
/// Every field is optional so that styling merges field-wise: a child section
/// overrides only what it sets. Color values are RGB integers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldStyling {
    pub font_size: Option<f32>,
    pub font_name: Option<String>,
    pub text_color: Option<u32>,
    pub background_color: Option<u32>,
    pub border_color: Option<u32>,
    pub border_width: Option<f32>,
    pub alignment: Option<TextAlignment>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub read_only: Option<bool>,
    pub hidden: Option<bool>,
}

/// A group of field mappings sharing one mapping strategy
///
/// `base_path` is evaluated once by the render backend and used as the context
/// object for every field in the group, so repeated filters do not re-run per
/// field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldMappingGroup {
    pub mapping_kind: MappingKind,
    pub base_path: Option<String>,
    /// Output field name -> source expression
    pub fields: BTreeMap<String, String>,
    /// Output field name -> styling overrides
    pub field_styles: BTreeMap<String, FieldStyling>,
    /// Styling applied to every field in the group unless overridden
    pub default_style: Option<FieldStyling>,
}

/// One renderable section of a template
///
/// `section_id` is the merge key: after inheritance merging a template never
/// contains two sections with the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSection {
    pub section_id: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    /// Resource path of the backing asset, subject to the same namespace
    /// rules as templates (`common:` marker, no `templates/` prefix)
    #[serde(default)]
    pub template_path: Option<String>,
    /// Visibility expression, uninterpreted by the resolution engine
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
    /// Simple field mappings: output field name -> source expression
    #[serde(default)]
    pub field_mappings: BTreeMap<String, String>,
    #[serde(default)]
    pub mapping_groups: Vec<FieldMappingGroup>,
}

/// A parsed-but-unmerged template document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTemplate {
    pub template_id: String,
    /// Inheritance parent, same namespace unless prefixed with `common:`
    #[serde(default)]
    pub base_template_id: Option<String>,
    #[serde(default)]
    pub sections: Vec<PageSection>,
    /// Fragment references included after inheritance merging, in order
    #[serde(default)]
    pub fragments: Vec<String>,
    /// Section ids removed from the inherited result
    #[serde(default)]
    pub exclude_section_ids: Vec<String>,
    /// Placeholder defaults, overlaid child-wins during merge
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl DocumentTemplate {
    /// Decode a template document from raw YAML bytes
    pub fn from_yaml(bytes: &[u8]) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_slice(bytes)
    }

    /// Find a section by id
    pub fn section(&self, section_id: &str) -> Option<&PageSection> {
        self.sections.iter().find(|s| s.section_id == section_id)
    }
}

/// A fully resolved template: inheritance flattened, fragments appended,
/// placeholders interpolated
///
/// Sections appear in composition order: base-inherited sections first (each
/// replaced in place if overridden), then net-new child sections, then
/// fragment sections in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTemplate {
    pub template_id: String,
    sections: Vec<PageSection>,
    pub metadata: BTreeMap<String, String>,
}

impl ResolvedTemplate {
    pub(crate) fn new(
        template_id: String,
        sections: Vec<PageSection>,
        metadata: BTreeMap<String, String>,
    ) -> Self {
        Self {
            template_id,
            sections,
            metadata,
        }
    }

    /// Sections in composition order (read-only)
    pub fn sections(&self) -> &[PageSection] {
        &self.sections
    }

    /// Find a section by id
    pub fn section(&self, section_id: &str) -> Option<&PageSection> {
        self.sections.iter().find(|s| s.section_id == section_id)
    }
}
