//! Placeholder interpolation over a merged template tree
//!
//! Every string-valued field in the section tree may contain `${name}`
//! tokens. Interpolation runs exactly once, on the fully merged tree, against
//! the runtime data supplied to the top-level call (with the template's own
//! metadata as fallback defaults). A token with no resolution is fatal:
//! partially substituted output is never returned.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::TemplateError;
use crate::model::DocumentTemplate;

/// Runtime data supplied with a resolution request
pub type RuntimeData = HashMap<String, Value>;

/// Substitute `${name}` tokens in every string field of the template
///
/// Lookup order: runtime data, then the template's `metadata` map. Only
/// scalar runtime values substitute (strings verbatim, numbers and booleans
/// via their display form); a null, array, or object value counts as
/// unresolved.
pub fn interpolate_template(
    template: &mut DocumentTemplate,
    data: &RuntimeData,
) -> Result<(), TemplateError> {
    let template_id = template.template_id.clone();
    let metadata = template.metadata.clone();

    let mut apply = |value: &mut String| -> Result<(), TemplateError> {
        if let Some(substituted) = interpolate_str(value, data, &metadata, &template_id)? {
            *value = substituted;
        }
        Ok(())
    };

    for section in &mut template.sections {
        if let Some(path) = section.template_path.as_mut() {
            apply(path)?;
        }
        if let Some(condition) = section.condition.as_mut() {
            apply(condition)?;
        }
        for expr in section.field_mappings.values_mut() {
            apply(expr)?;
        }
        for group in &mut section.mapping_groups {
            if let Some(base_path) = group.base_path.as_mut() {
                apply(base_path)?;
            }
            for expr in group.fields.values_mut() {
                apply(expr)?;
            }
        }
    }

    Ok(())
}

/// Substitute tokens in one string; `Ok(None)` means nothing to substitute
fn interpolate_str(
    input: &str,
    data: &RuntimeData,
    metadata: &std::collections::BTreeMap<String, String>,
    template_id: &str,
) -> Result<Option<String>, TemplateError> {
    if !input.contains("${") {
        return Ok(None);
    }

    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find('}') else {
            // Unterminated token: passed through verbatim.
            output.push_str(&rest[start..]);
            return Ok(Some(output));
        };

        let token = &after[..end];
        let value = lookup(token, data, metadata).ok_or_else(|| {
            TemplateError::UnresolvedPlaceholder {
                token: token.to_string(),
                template_id: template_id.to_string(),
            }
        })?;
        output.push_str(&value);
        rest = &after[end + 1..];
    }

    output.push_str(rest);
    Ok(Some(output))
}

fn lookup(
    token: &str,
    data: &RuntimeData,
    metadata: &std::collections::BTreeMap<String, String>,
) -> Option<String> {
    match data.get(token) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(_) => None,
        None => metadata.get(token).cloned(),
    }
}
