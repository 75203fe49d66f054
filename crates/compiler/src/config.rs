use serde::{Deserialize, Serialize};

use atelier_core::error::CoreError;

/// How directive phrases are laid out inside the directive block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveLayout {
    /// Header line, then one `- phrase` line per directive.
    #[default]
    Lines,
    /// Header followed by `; `-joined phrases on a single line.
    Inline,
}

/// Layout options for compiled prompt text and display listings.
///
/// All fields have defaults, so a partial JSON document (or `{}`) is a valid
/// configuration.
///
/// | Field                 | Default              |
/// |-----------------------|----------------------|
/// | `directive_layout`    | `lines`              |
/// | `directive_header`    | `ANTI-AI DIRECTIVES` |
/// | `forbidden_header`    | `AVOID`              |
/// | `block_separator`     | `"\n\n"`             |
/// | `variation_separator` | `"\n"`               |
/// | `display_placeholder` | `Not set`            |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub directive_layout: DirectiveLayout,
    /// Header introducing the directive phrases.
    pub directive_header: String,
    /// Header introducing forbidden-phrase exclusions.
    pub forbidden_header: String,
    /// Placed between the visual block and the directive block.
    pub block_separator: String,
    /// Placed between the base text and a variation suffix.
    pub variation_separator: String,
    /// Shown in display listings for fields with no value.
    pub display_placeholder: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            directive_layout: DirectiveLayout::Lines,
            directive_header: "ANTI-AI DIRECTIVES".into(),
            forbidden_header: "AVOID".into(),
            block_separator: "\n\n".into(),
            variation_separator: "\n".into(),
            display_placeholder: "Not set".into(),
        }
    }
}

impl CompilerConfig {
    /// Parse a configuration document; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        serde_json::from_str(text).map_err(|e| CoreError::schema("compiler config", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = CompilerConfig::from_json("{}").unwrap();
        assert_eq!(config, CompilerConfig::default());
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let config =
            CompilerConfig::from_json(r#"{"directive_layout": "inline", "forbidden_header": "NEVER"}"#)
                .unwrap();
        assert_eq!(config.directive_layout, DirectiveLayout::Inline);
        assert_eq!(config.forbidden_header, "NEVER");
        assert_eq!(config.directive_header, "ANTI-AI DIRECTIVES");
    }

    #[test]
    fn unknown_layout_is_rejected() {
        let err = CompilerConfig::from_json(r#"{"directive_layout": "table"}"#).unwrap_err();
        assert!(err.to_string().contains("compiler config"));
    }
}
