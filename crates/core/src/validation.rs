//! Record validation limits and helpers.
//!
//! Compilation itself never fails; these checks are for callers that want to
//! reject records (or an empty compiled prompt) before persisting them.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::schema::{StylePreset, Universe};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length for a universe or style preset name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum number of forbidden phrases in one Anti-AI settings group.
pub const MAX_FORBIDDEN_PHRASES: usize = 50;

/// Maximum length of a single forbidden phrase or directive.
pub const MAX_PHRASE_LENGTH: usize = 200;

/// Maximum length of a variation prompt suffix.
pub const MAX_VARIATION_SUFFIX_LENGTH: usize = 1_000;

/// Maximum length of a compiled prompt in characters.
pub const MAX_PROMPT_LENGTH: usize = 10_000;

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Validate a record name: non-empty after trimming and within length limit.
pub fn validate_name(kind: &str, name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!(
            "{kind} name must not be empty"
        )));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{kind} name too long: {} chars (max {MAX_NAME_LENGTH})",
            trimmed.chars().count()
        )));
    }
    Ok(())
}

/// Validate a forbidden-phrase list: bounded count, bounded phrase length.
pub fn validate_forbidden_phrases(phrases: &[String]) -> Result<(), CoreError> {
    if phrases.len() > MAX_FORBIDDEN_PHRASES {
        return Err(CoreError::Validation(format!(
            "Forbidden phrase count exceeds maximum of {MAX_FORBIDDEN_PHRASES} (got {})",
            phrases.len()
        )));
    }
    validate_phrase_lengths("Forbidden phrase", phrases)
}

fn validate_phrase_lengths(kind: &str, phrases: &[String]) -> Result<(), CoreError> {
    if let Some(long) = phrases
        .iter()
        .find(|p| p.chars().count() > MAX_PHRASE_LENGTH)
    {
        return Err(CoreError::Validation(format!(
            "{kind} exceeds maximum length of {MAX_PHRASE_LENGTH} characters (got {})",
            long.chars().count()
        )));
    }
    Ok(())
}

/// Validate a compiled prompt for callers that treat an empty prompt as an
/// error. The compiler itself returns `""` for all-default input.
pub fn validate_compiled_prompt(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(
            "Compiled prompt must not be empty".to_string(),
        ));
    }
    let len = text.chars().count();
    if len > MAX_PROMPT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Compiled prompt exceeds maximum length of {MAX_PROMPT_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Record validation
// ---------------------------------------------------------------------------

/// Validate a universe: name plus its baseline forbidden phrases.
pub fn validate_universe(universe: &Universe) -> Result<(), CoreError> {
    validate_name("Universe", &universe.name)?;
    if let Some(phrases) = universe
        .params
        .anti_ai
        .as_ref()
        .and_then(|a| a.forbidden_phrases.as_deref())
    {
        validate_forbidden_phrases(phrases)?;
    }
    Ok(())
}

/// Validate a style preset: name, directives, forbidden phrases, and
/// variations (non-empty, unique ids; bounded suffix length).
pub fn validate_style_preset(preset: &StylePreset) -> Result<(), CoreError> {
    validate_name("Style preset", &preset.name)?;
    validate_phrase_lengths("Directive", &preset.anti_ai_directives)?;
    if let Some(phrases) = preset
        .technical_params
        .anti_ai
        .as_ref()
        .and_then(|a| a.forbidden_phrases.as_deref())
    {
        validate_forbidden_phrases(phrases)?;
    }

    let mut seen = HashSet::new();
    for variation in &preset.variations {
        let id = variation.id.trim();
        if id.is_empty() {
            return Err(CoreError::Validation(
                "Variation id must not be empty".to_string(),
            ));
        }
        if !seen.insert(id) {
            return Err(CoreError::Validation(format!(
                "Duplicate variation id '{id}'"
            )));
        }
        if variation.prompt_suffix.chars().count() > MAX_VARIATION_SUFFIX_LENGTH {
            return Err(CoreError::Validation(format!(
                "Variation '{id}' suffix exceeds maximum length of {MAX_VARIATION_SUFFIX_LENGTH} characters"
            )));
        }
    }
    Ok(())
}
