//! Anti-AI directive rendering.
//!
//! Turns effective Anti-AI settings into directive phrases plus a list of
//! forbidden phrases. The assembler places both in a block of their own so a
//! downstream consumer can strip or inspect them separately.

use std::collections::HashSet;

use serde::Serialize;

use atelier_core::schema::{AntiAiSettings, FieldValue, ParamGroup, PoseProfile};

use crate::normalize::{is_sentinel, normalize_text};

/// Pose guidance for [`PoseProfile::Natural`].
pub const NATURAL_POSE_DIRECTIVE: &str =
    "Natural, unposed body language with relaxed hands and candid weight shifts";

/// Pose guidance for [`PoseProfile::Posed`].
pub const POSED_POSE_DIRECTIVE: &str =
    "Deliberate editorial posing with intentional, held positions";

/// Level value that switches setting-derived directives off.
pub const LEVEL_OFF: &str = "off";

/// Key light value that means "no key light guidance".
pub const KEY_LIGHT_AUTO: &str = "auto";

/// Flags that emit a phrase when set to `true`, in output order.
pub const FLAG_DIRECTIVES: &[(&str, &str)] = &[
    ("allowMotionBlur", "Allow slight motion blur"),
    ("allowMissedFocus", "Allow slightly missed focus"),
    ("requireSkinTexture", "Require visible skin texture"),
    ("requireAsymmetry", "Require natural facial asymmetry"),
];

/// Rendered directives and exclusions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectiveBlock {
    pub directives: Vec<String>,
    pub forbidden: Vec<String>,
}

impl DirectiveBlock {
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty() && self.forbidden.is_empty()
    }
}

/// Pose phrase for a resolved profile. `auto` and `off` carry no guidance.
pub fn pose_directive(profile: PoseProfile) -> Option<&'static str> {
    match profile {
        PoseProfile::Natural => Some(NATURAL_POSE_DIRECTIVE),
        PoseProfile::Posed => Some(POSED_POSE_DIRECTIVE),
        PoseProfile::Auto | PoseProfile::Off => None,
    }
}

/// Render effective Anti-AI settings.
///
/// Order: pose, realism level, key light, enabled flags, notes. A level of
/// `off` disables every setting-derived directive and exclusion.
pub fn render_directives(settings: &AntiAiSettings) -> DirectiveBlock {
    let level = settings
        .level
        .as_deref()
        .map(|l| normalize_text("level", l))
        .filter(|l| !l.is_empty());

    if level.as_deref().is_some_and(|l| is_sentinel(l, LEVEL_OFF)) {
        tracing::debug!("Anti-AI level is off; skipping setting-derived directives");
        return DirectiveBlock::default();
    }

    let mut directives: Vec<String> = Vec::new();

    if let Some(phrase) = pose_directive(settings.pose()) {
        directives.push(phrase.to_string());
    }

    if let Some(level) = level {
        directives.push(format!("Realism level: {level}"));
    }

    if let Some(key_light) = settings
        .key_light
        .as_deref()
        .map(|k| normalize_text("keyLight", k))
        .filter(|k| !k.is_empty() && !is_sentinel(k, KEY_LIGHT_AUTO))
    {
        directives.push(format!("Key light: {key_light}"));
    }

    for (key, phrase) in FLAG_DIRECTIVES {
        if settings.field(key) == FieldValue::Flag(true) {
            directives.push((*phrase).to_string());
        }
    }

    if let Some(notes) = settings
        .notes
        .as_deref()
        .map(|n| normalize_text("notes", n))
        .filter(|n| !n.is_empty())
    {
        directives.push(notes);
    }

    let forbidden = dedup_phrases(
        settings
            .forbidden_phrases
            .iter()
            .flatten()
            .map(String::as_str),
    );

    DirectiveBlock {
        directives,
        forbidden,
    }
}

/// Trim, drop empty, and de-duplicate phrases case-insensitively, keeping the
/// first spelling seen.
pub fn dedup_phrases<'a>(phrases: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    phrases
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .filter(|p| seen.insert(p.to_lowercase()))
        .map(str::to_string)
        .collect()
}
