//! Flattened `path -> value` listings for operator UIs.
//!
//! Listings share normalization with prompt compilation but are built from
//! the bundle independently, so nothing here can change compiled text.

use serde::Serialize;
use serde_json::Value;

use atelier_core::schema::{FieldValue, ParamGroup, ParameterBundle};

use crate::config::CompilerConfig;
use crate::normalize::{display_bool, humanize_key, normalize, normalize_list, normalize_text};

/// One row of a display listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayEntry {
    /// Dotted path, e.g. `capture.cameraSystem`.
    pub path: String,
    pub label: String,
    /// Display text; the configured placeholder when unset.
    pub value: String,
    /// List elements as discrete tags. Empty for scalar values.
    pub tags: Vec<String>,
    pub is_set: bool,
}

impl DisplayEntry {
    fn set(path: String, key: &str, value: String, tags: Vec<String>) -> Self {
        Self {
            path,
            label: humanize_key(key),
            value,
            tags,
            is_set: true,
        }
    }

    fn unset(path: String, key: &str, placeholder: &str) -> Self {
        Self {
            path,
            label: humanize_key(key),
            value: placeholder.to_string(),
            tags: Vec::new(),
            is_set: false,
        }
    }
}

/// Flatten with the default configuration.
pub fn flatten_for_display(bundle: &ParameterBundle) -> Vec<DisplayEntry> {
    flatten_for_display_with(&CompilerConfig::default(), bundle)
}

/// Flatten every present group: known fields in schema order, then unknown
/// keys in sorted order. Absent groups are skipped.
pub fn flatten_for_display_with(
    config: &CompilerConfig,
    bundle: &ParameterBundle,
) -> Vec<DisplayEntry> {
    let placeholder = config.display_placeholder.as_str();
    let mut out = Vec::new();
    push_group(&mut out, placeholder, bundle.capture.as_ref());
    push_group(&mut out, placeholder, bundle.light.as_ref());
    push_group(&mut out, placeholder, bundle.color.as_ref());
    push_group(&mut out, placeholder, bundle.texture.as_ref());
    push_group(&mut out, placeholder, bundle.optical.as_ref());
    push_group(&mut out, placeholder, bundle.composition.as_ref());
    push_group(&mut out, placeholder, bundle.post_process.as_ref());
    push_group(&mut out, placeholder, bundle.era.as_ref());
    push_group(&mut out, placeholder, bundle.default_frame_params.as_ref());
    push_group(&mut out, placeholder, bundle.anti_ai.as_ref());
    out
}

fn push_group<G: ParamGroup>(out: &mut Vec<DisplayEntry>, placeholder: &str, group: Option<&G>) {
    let Some(group) = group else {
        return;
    };

    for (key, _) in G::FIELDS {
        let path = format!("{}.{key}", G::GROUP_KEY);
        out.push(known_entry(path, key, group.field(key), placeholder));
    }

    for (key, value) in group.extra() {
        let path = format!("{}.{key}", G::GROUP_KEY);
        match value {
            Value::Object(nested) => {
                for (inner_key, inner) in nested {
                    out.push(raw_entry(format!("{path}.{inner_key}"), inner_key, inner, placeholder));
                }
            }
            other => out.push(raw_entry(path, key, other, placeholder)),
        }
    }
}

fn known_entry(path: String, key: &str, value: FieldValue<'_>, placeholder: &str) -> DisplayEntry {
    match value {
        FieldValue::Absent => DisplayEntry::unset(path, key, placeholder),
        FieldValue::Flag(flag) => {
            DisplayEntry::set(path, key, display_bool(flag).to_string(), Vec::new())
        }
        FieldValue::Text(raw) => {
            let text = normalize_text(key, raw);
            if text.is_empty() {
                DisplayEntry::unset(path, key, placeholder)
            } else {
                DisplayEntry::set(path, key, text, Vec::new())
            }
        }
        FieldValue::List(items) => {
            let tags = normalize_list(key, items);
            if tags.is_empty() {
                DisplayEntry::unset(path, key, placeholder)
            } else {
                DisplayEntry::set(path, key, tags.join(", "), tags)
            }
        }
    }
}

/// Entry for a key outside the schema. Objects below the first nested level
/// are shown as compact JSON.
fn raw_entry(path: String, key: &str, value: &Value, placeholder: &str) -> DisplayEntry {
    match value {
        Value::Object(_) => DisplayEntry::set(path, key, value.to_string(), Vec::new()),
        Value::Array(items) => {
            let tags: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(_) | Value::Array(_) => Some(item.to_string()),
                    other => normalize(key, other),
                })
                .collect();
            if tags.is_empty() {
                DisplayEntry::unset(path, key, placeholder)
            } else {
                DisplayEntry::set(path, key, tags.join(", "), tags)
            }
        }
        scalar => match normalize(key, scalar) {
            Some(text) => DisplayEntry::set(path, key, text, Vec::new()),
            None => DisplayEntry::unset(path, key, placeholder),
        },
    }
}
