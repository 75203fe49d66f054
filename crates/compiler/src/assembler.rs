//! Prompt assembly.
//!
//! The compiled prompt has up to three parts, always in this order:
//!
//! 1. The visual block: one line per non-empty section, in section order.
//! 2. The directive block: Anti-AI directives and exclusions under fixed
//!    headers, separated from the visual block by `block_separator`.
//! 3. An optional variation suffix, appended verbatim after
//!    `variation_separator`.

use serde::Serialize;

use atelier_core::schema::ParameterBundle;

use crate::config::{CompilerConfig, DirectiveLayout};
use crate::directives::{dedup_phrases, render_directives, DirectiveBlock};
use crate::normalize::trim_terminal_period;
use crate::resolver::EffectiveParams;
use crate::sections::compile_sections;

/// Approximate tokens per whitespace-separated word.
const TOKEN_ESTIMATE_MULTIPLIER: f64 = 1.3;

/// A compiled prompt with its parts kept apart for inspection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssembledPrompt {
    /// Section lines joined by newlines.
    pub visual: String,
    /// The rendered directive block, empty when there is nothing to direct.
    pub directives: String,
    /// Final prompt text, including any variation suffix.
    pub text: String,
    pub estimated_tokens: usize,
}

/// Estimate the token count of `text` (words × 1.3, rounded up).
pub fn estimate_token_count(text: &str) -> usize {
    let word_count = text.split_whitespace().count();
    (word_count as f64 * TOKEN_ESTIMATE_MULTIPLIER).ceil() as usize
}

/// Compile every section of `bundle` and join the non-empty lines.
pub fn compile_visual_block(bundle: &ParameterBundle) -> String {
    compile_sections(bundle)
        .into_iter()
        .map(|line| line.text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render caller-supplied directives followed by the rendered ones, then the
/// exclusions. Returns an empty string when both lists are empty.
pub fn render_directive_block(
    config: &CompilerConfig,
    caller_directives: &[String],
    rendered: &DirectiveBlock,
) -> String {
    let directives = dedup_phrases(
        caller_directives
            .iter()
            .chain(&rendered.directives)
            .map(String::as_str),
    );

    let mut parts = Vec::with_capacity(2);
    if !directives.is_empty() {
        parts.push(render_list(config, &config.directive_header, &directives));
    }
    if !rendered.forbidden.is_empty() {
        parts.push(render_list(config, &config.forbidden_header, &rendered.forbidden));
    }
    parts.join("\n")
}

fn render_list(config: &CompilerConfig, header: &str, phrases: &[String]) -> String {
    match config.directive_layout {
        DirectiveLayout::Lines => {
            let mut out = format!("{header}:");
            for phrase in phrases {
                out.push_str("\n- ");
                out.push_str(phrase);
            }
            out
        }
        DirectiveLayout::Inline => {
            let joined = phrases
                .iter()
                .map(|p| trim_terminal_period(p))
                .collect::<Vec<_>>()
                .join("; ");
            format!("{header}: {joined}.")
        }
    }
}

/// Assemble with the default configuration.
pub fn assemble(
    effective: &EffectiveParams,
    anti_ai_directives: &[String],
    variation_suffix: Option<&str>,
) -> String {
    assemble_with(
        &CompilerConfig::default(),
        effective,
        anti_ai_directives,
        variation_suffix,
    )
}

pub fn assemble_with(
    config: &CompilerConfig,
    effective: &EffectiveParams,
    anti_ai_directives: &[String],
    variation_suffix: Option<&str>,
) -> String {
    assemble_parts(config, effective, anti_ai_directives, variation_suffix).text
}

/// Assemble and return each part alongside the final text.
pub fn assemble_parts(
    config: &CompilerConfig,
    effective: &EffectiveParams,
    anti_ai_directives: &[String],
    variation_suffix: Option<&str>,
) -> AssembledPrompt {
    let visual = compile_visual_block(&effective.params);
    let rendered = render_directives(&effective.anti_ai());
    let directives = render_directive_block(config, anti_ai_directives, &rendered);

    tracing::debug!(
        sections = visual.lines().count(),
        caller_directives = anti_ai_directives.len(),
        rendered_directives = rendered.directives.len(),
        forbidden = rendered.forbidden.len(),
        "Assembled prompt blocks"
    );

    finish(config, visual, directives, variation_suffix)
}

/// Join the visual and directive blocks and append the variation suffix.
pub(crate) fn finish(
    config: &CompilerConfig,
    visual: String,
    directives: String,
    variation_suffix: Option<&str>,
) -> AssembledPrompt {
    let base = [visual.as_str(), directives.as_str()]
        .into_iter()
        .filter(|block| !block.is_empty())
        .collect::<Vec<_>>()
        .join(&config.block_separator);

    let text = match variation_suffix.filter(|s| !s.trim().is_empty()) {
        Some(suffix) if base.is_empty() => suffix.to_string(),
        Some(suffix) => format!("{base}{}{suffix}", config.variation_separator),
        None => base,
    };

    let estimated_tokens = estimate_token_count(&text);
    AssembledPrompt {
        visual,
        directives,
        text,
        estimated_tokens,
    }
}
