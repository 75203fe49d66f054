//! Helpers for the `naturalPrompt` text cached on Style Presets.
//!
//! The cached text is derived data: it is always recomputed from the universe
//! and preset and compared, never trusted.

use atelier_core::hashing::sha256_hex;
use atelier_core::schema::{StylePreset, Universe};

use crate::assembler::assemble;
use crate::resolver::resolve;

/// Compile the base prompt for a universe and preset, without scene data,
/// shoot overrides or variations.
pub fn compile_natural_prompt(universe: &Universe, preset: &StylePreset) -> String {
    let effective = resolve(universe, Some(preset), None, None);
    assemble(&effective, &preset.anti_ai_directives, None)
}

/// Whether the preset's cached text differs from a fresh compilation.
/// A missing cache counts as stale.
pub fn natural_prompt_is_stale(universe: &Universe, preset: &StylePreset) -> bool {
    match preset.natural_prompt.as_deref() {
        Some(cached) => cached != compile_natural_prompt(universe, preset),
        None => true,
    }
}

/// SHA-256 hex digest of compiled prompt text.
pub fn prompt_fingerprint(text: &str) -> String {
    sha256_hex(text.as_bytes())
}

/// Recompile the cached text in place. Returns `true` when it changed.
pub fn refresh_natural_prompt(universe: &Universe, preset: &mut StylePreset) -> bool {
    let fresh = compile_natural_prompt(universe, preset);
    if preset.natural_prompt.as_deref() == Some(fresh.as_str()) {
        return false;
    }

    tracing::debug!(
        style_preset = %preset.name,
        fingerprint = %prompt_fingerprint(&fresh),
        "Refreshed cached natural prompt"
    );
    preset.natural_prompt = Some(fresh);
    true
}
