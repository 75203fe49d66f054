//! Lexical normalization shared by prompt compilation and display listings.
//!
//! Every value that reaches prompt text or a display chip goes through these
//! functions, so both surfaces render a given value identically.

use std::sync::LazyLock;

use serde_json::Value;

/// The end of an uppercase run before a capitalized word: `HDRForbidden`.
static ACRONYM_BOUNDARY_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("valid regex"));

/// Lowercase-or-digit followed by uppercase: a camelCase word boundary.
static CAMEL_BOUNDARY_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));

/// Free-text keys whose values are kept as written (trimmed only).
pub const VERBATIM_KEYS: &[&str] = &["notes", "description", "promptSnippet", "label"];

/// Turn a field key into a human label: `"cameraSystem"` → `"Camera system"`.
pub fn humanize_key(key: &str) -> String {
    let split = ACRONYM_BOUNDARY_RE.replace_all(key, "$1 $2");
    let spaced = CAMEL_BOUNDARY_RE.replace_all(&split, "$1 $2").replace('_', " ");
    let lower = spaced
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    capitalize_first(&lower)
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Normalize a text value: underscores become spaces and runs of whitespace
/// collapse. Case is left alone. Free-text keys are only trimmed.
pub fn normalize_text(key: &str, value: &str) -> String {
    if VERBATIM_KEYS.contains(&key) {
        return value.trim().to_string();
    }
    value
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn display_bool(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Normalize each list element independently, dropping empty ones.
pub fn normalize_list(key: &str, items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| normalize_text(key, item))
        .filter(|item| !item.is_empty())
        .collect()
}

/// Normalize a raw JSON value for display.
///
/// Returns `None` for null, empty text, empty lists, and objects (callers
/// flatten objects themselves).
pub fn normalize(key: &str, value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::Bool(flag) => Some(display_bool(*flag).to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(normalize_text(key, s)).filter(|s| !s.is_empty()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(_) | Value::Array(_) => Some(item.to_string()),
                    other => normalize(key, other),
                })
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
    }
}

/// Whether `value` equals `sentinel`, ignoring surrounding whitespace and
/// ASCII case.
pub fn is_sentinel(value: &str, sentinel: &str) -> bool {
    value.trim().eq_ignore_ascii_case(sentinel)
}

/// Strip trailing periods so a value can end a clause without doubling them.
pub fn trim_terminal_period(text: &str) -> &str {
    text.trim_end().trim_end_matches('.').trim_end()
}
