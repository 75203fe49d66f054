//! Section compilers: one declarative rule table per creative axis, executed
//! by a single engine.
//!
//! A rule names a field, an optional sentinel meaning "default, say nothing",
//! and how the field renders as a clause. Rule order is clause order; section
//! order is fixed by [`SectionKind::ALL`].

use serde::Serialize;

use atelier_core::schema::{FieldValue, ParamGroup, ParameterBundle};

use crate::normalize::{is_sentinel, normalize_list, normalize_text, trim_terminal_period};

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

/// A value that denotes default/unremarkable state and is never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    Never,
    Value(&'static str),
}

/// How a field renders once it survives suppression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    /// The normalized value as-is.
    Plain,
    /// `{}` is replaced with the normalized value (lists comma-joined).
    Template(&'static str),
    /// `label: value` (lists comma-joined).
    Labeled(&'static str),
    /// A fixed phrase, emitted only when the flag equals `when`.
    Flag { when: bool, phrase: &'static str },
}

/// One row of a section table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseRule {
    pub key: &'static str,
    pub sentinel: Sentinel,
    pub render: Render,
}

impl ClauseRule {
    pub const fn plain(key: &'static str) -> Self {
        Self {
            key,
            sentinel: Sentinel::Never,
            render: Render::Plain,
        }
    }

    pub const fn template(key: &'static str, template: &'static str) -> Self {
        Self {
            key,
            sentinel: Sentinel::Never,
            render: Render::Template(template),
        }
    }

    pub const fn labeled(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            sentinel: Sentinel::Never,
            render: Render::Labeled(label),
        }
    }

    pub const fn flag(key: &'static str, when: bool, phrase: &'static str) -> Self {
        Self {
            key,
            sentinel: Sentinel::Never,
            render: Render::Flag { when, phrase },
        }
    }

    /// Suppress the clause when the value (or every list element) equals
    /// `sentinel`.
    pub const fn unless(self, sentinel: &'static str) -> Self {
        Self {
            sentinel: Sentinel::Value(sentinel),
            ..self
        }
    }
}

pub static CAPTURE_RULES: &[ClauseRule] = &[
    ClauseRule::template("mediumType", "{} photography"),
    ClauseRule::template("cameraSystem", "shot on {}"),
    ClauseRule::template("filmStock", "{} film stock"),
    ClauseRule::template("grainStructure", "{} grain").unless("none"),
    ClauseRule::labeled("scanArtifacts", "scan artifacts").unless("none"),
];

pub static LIGHT_RULES: &[ClauseRule] = &[
    ClauseRule::template("primaryLightType", "{} light"),
    ClauseRule::template("lightDirection", "light from {}"),
    ClauseRule::template("shadowBehavior", "{} shadows"),
    ClauseRule::template("colorTemperature", "{} color temperature"),
    ClauseRule::labeled("lightImperfections", "light imperfections").unless("none"),
];

pub static COLOR_RULES: &[ClauseRule] = &[
    ClauseRule::template("dominantPalette", "{} palette"),
    ClauseRule::template("saturation", "{} saturation"),
    ClauseRule::plain("contrast"),
    ClauseRule::template("whiteBalance", "{} white balance"),
    ClauseRule::template("colorCast", "{} color cast").unless("none"),
    ClauseRule::labeled("skinToneRendering", "skin tones"),
];

pub static TEXTURE_RULES: &[ClauseRule] = &[
    ClauseRule::labeled("skinTexture", "skin texture"),
    ClauseRule::flag("skinSmoothing", false, "NO skin smoothing"),
    ClauseRule::template("fabricDetail", "{} fabric detail"),
    ClauseRule::labeled("surfaceImperfections", "surface imperfections").unless("none"),
];

pub static OPTICAL_RULES: &[ClauseRule] = &[
    ClauseRule::template("lensType", "{} lens"),
    ClauseRule::labeled("focalLength", "focal length"),
    ClauseRule::labeled("aperture", "aperture"),
    ClauseRule::template("depthOfField", "{} depth of field"),
    ClauseRule::labeled("focusAccuracy", "focus").unless("perfect"),
    ClauseRule::template("vignetting", "{} vignetting").unless("none"),
    ClauseRule::template("halation", "{} halation").unless("none"),
    ClauseRule::template("chromaticAberration", "{} chromatic aberration").unless("none"),
    ClauseRule::template("distortion", "{} lens distortion").unless("none"),
];

pub static COMPOSITION_RULES: &[ClauseRule] = &[
    ClauseRule::template("framing", "{} framing"),
    ClauseRule::template("cameraAngle", "{} angle"),
    ClauseRule::labeled("subjectPlacement", "subject placement"),
    ClauseRule::labeled("horizonBehavior", "horizon").unless("level"),
    ClauseRule::template("negativeSpace", "{} negative space"),
];

pub static POST_PROCESS_RULES: &[ClauseRule] = &[
    ClauseRule::template("editingStyle", "{} edit"),
    ClauseRule::template("toneCurve", "{} tone curve"),
    ClauseRule::template("sharpening", "{} sharpening"),
    ClauseRule::flag("hdrForbidden", true, "NO HDR"),
    ClauseRule::template("retouchingLevel", "{} retouching").unless("none"),
];

pub static ERA_RULES: &[ClauseRule] = &[
    ClauseRule::template("decade", "{} era"),
    ClauseRule::template("aesthetic", "{} aesthetic"),
    ClauseRule::labeled("culturalReferences", "references"),
    ClauseRule::flag("anachronismsForbidden", true, "NO anachronisms"),
];

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// The compiled creative axes, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Capture,
    Light,
    Color,
    Texture,
    Optical,
    Composition,
    PostProcess,
    Era,
}

impl SectionKind {
    /// Fixed compilation order.
    pub const ALL: [SectionKind; 8] = [
        Self::Capture,
        Self::Light,
        Self::Color,
        Self::Texture,
        Self::Optical,
        Self::Composition,
        Self::PostProcess,
        Self::Era,
    ];

    /// Heading that starts the section's line.
    pub fn title(self) -> &'static str {
        match self {
            Self::Capture => "CAPTURE",
            Self::Light => "LIGHT",
            Self::Color => "COLOR",
            Self::Texture => "TEXTURE",
            Self::Optical => "OPTICAL",
            Self::Composition => "COMPOSITION",
            Self::PostProcess => "POST-PROCESS",
            Self::Era => "ERA",
        }
    }

    pub fn rules(self) -> &'static [ClauseRule] {
        match self {
            Self::Capture => CAPTURE_RULES,
            Self::Light => LIGHT_RULES,
            Self::Color => COLOR_RULES,
            Self::Texture => TEXTURE_RULES,
            Self::Optical => OPTICAL_RULES,
            Self::Composition => COMPOSITION_RULES,
            Self::PostProcess => POST_PROCESS_RULES,
            Self::Era => ERA_RULES,
        }
    }
}

/// One compiled section line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionLine {
    pub kind: SectionKind,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Render one field under `rule`, or `None` when it contributes nothing.
pub fn render_clause(section: &str, rule: &ClauseRule, value: FieldValue<'_>) -> Option<String> {
    let text = match value {
        FieldValue::Absent => return None,
        FieldValue::Flag(flag) => {
            return match rule.render {
                Render::Flag { when, phrase } if flag == when => Some(phrase.to_string()),
                _ => None,
            };
        }
        FieldValue::Text(raw) => {
            let normalized = normalize_text(rule.key, raw);
            let value = trim_terminal_period(&normalized);
            if value.is_empty() {
                return None;
            }
            if let Sentinel::Value(sentinel) = rule.sentinel {
                if is_sentinel(value, sentinel) {
                    tracing::trace!(section, field = rule.key, sentinel, "Suppressed sentinel value");
                    return None;
                }
            }
            value.to_string()
        }
        FieldValue::List(items) => {
            let kept: Vec<String> = normalize_list(rule.key, items)
                .into_iter()
                .map(|item| trim_terminal_period(&item).to_string())
                .filter(|item| !item.is_empty())
                .filter(|item| match rule.sentinel {
                    Sentinel::Value(sentinel) => !is_sentinel(item, sentinel),
                    Sentinel::Never => true,
                })
                .collect();
            if kept.is_empty() {
                tracing::trace!(section, field = rule.key, "Suppressed list with no remaining values");
                return None;
            }
            kept.join(", ")
        }
    };

    match rule.render {
        Render::Plain => Some(text),
        Render::Template(template) => Some(template.replace("{}", &text)),
        Render::Labeled(label) => Some(format!("{label}: {text}")),
        Render::Flag { .. } => None,
    }
}

/// Compile one group against a rule table.
///
/// Returns `"<TITLE>: clause; clause."`, or `None` when every field is absent
/// or suppressed.
pub fn compile_group<G: ParamGroup>(title: &str, rules: &[ClauseRule], group: &G) -> Option<String> {
    let clauses: Vec<String> = rules
        .iter()
        .filter_map(|rule| render_clause(title, rule, group.field(rule.key)))
        .collect();

    if clauses.is_empty() {
        None
    } else {
        Some(format!("{title}: {}.", clauses.join("; ")))
    }
}

/// Compile one section of a bundle. Absent groups compile to `None`.
pub fn compile_section(kind: SectionKind, bundle: &ParameterBundle) -> Option<String> {
    let title = kind.title();
    let rules = kind.rules();
    match kind {
        SectionKind::Capture => compile_group(title, rules, bundle.capture.as_ref()?),
        SectionKind::Light => compile_group(title, rules, bundle.light.as_ref()?),
        SectionKind::Color => compile_group(title, rules, bundle.color.as_ref()?),
        SectionKind::Texture => compile_group(title, rules, bundle.texture.as_ref()?),
        SectionKind::Optical => compile_group(title, rules, bundle.optical.as_ref()?),
        SectionKind::Composition => compile_group(title, rules, bundle.composition.as_ref()?),
        SectionKind::PostProcess => compile_group(title, rules, bundle.post_process.as_ref()?),
        SectionKind::Era => compile_group(title, rules, bundle.era.as_ref()?),
    }
}

/// Compile every section in fixed order, skipping the empty ones.
pub fn compile_sections(bundle: &ParameterBundle) -> Vec<SectionLine> {
    SectionKind::ALL
        .iter()
        .filter_map(|&kind| {
            compile_section(kind, bundle).map(|text| SectionLine { kind, text })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::schema::{
        CaptureParams, ColorParams, CompositionParams, EraParams, LightParams, OpticalParams,
        PostProcessParams, TextureParams,
    };
    use serde_json::json;

    fn bundle(value: serde_json::Value) -> ParameterBundle {
        serde_json::from_value(value).unwrap()
    }

    // --- Tables ---

    fn assert_rules_match_schema<G: ParamGroup>(kind: SectionKind) {
        for rule in kind.rules() {
            assert!(
                G::FIELDS.iter().any(|(key, _)| *key == rule.key),
                "{} rule references unknown field {}",
                kind.title(),
                rule.key
            );
        }
    }

    #[test]
    fn every_rule_names_a_schema_field() {
        assert_rules_match_schema::<CaptureParams>(SectionKind::Capture);
        assert_rules_match_schema::<LightParams>(SectionKind::Light);
        assert_rules_match_schema::<ColorParams>(SectionKind::Color);
        assert_rules_match_schema::<TextureParams>(SectionKind::Texture);
        assert_rules_match_schema::<OpticalParams>(SectionKind::Optical);
        assert_rules_match_schema::<CompositionParams>(SectionKind::Composition);
        assert_rules_match_schema::<PostProcessParams>(SectionKind::PostProcess);
        assert_rules_match_schema::<EraParams>(SectionKind::Era);
    }

    #[test]
    fn documented_sentinels_are_in_the_tables() {
        let sentinel_of = |kind: SectionKind, key: &str| {
            kind.rules()
                .iter()
                .find(|r| r.key == key)
                .map(|r| r.sentinel)
                .unwrap()
        };
        assert_eq!(sentinel_of(SectionKind::Capture, "grainStructure"), Sentinel::Value("none"));
        assert_eq!(sentinel_of(SectionKind::Capture, "scanArtifacts"), Sentinel::Value("none"));
        assert_eq!(sentinel_of(SectionKind::Light, "lightImperfections"), Sentinel::Value("none"));
        assert_eq!(sentinel_of(SectionKind::Optical, "focusAccuracy"), Sentinel::Value("perfect"));
        assert_eq!(sentinel_of(SectionKind::Optical, "vignetting"), Sentinel::Value("none"));
        assert_eq!(sentinel_of(SectionKind::Optical, "halation"), Sentinel::Value("none"));
        assert_eq!(
            sentinel_of(SectionKind::Optical, "chromaticAberration"),
            Sentinel::Value("none")
        );
        assert_eq!(sentinel_of(SectionKind::Composition, "horizonBehavior"), Sentinel::Value("level"));
        assert_eq!(sentinel_of(SectionKind::Optical, "distortion"), Sentinel::Value("none"));
        assert_eq!(sentinel_of(SectionKind::Color, "colorCast"), Sentinel::Value("none"));
        assert_eq!(sentinel_of(SectionKind::PostProcess, "retouchingLevel"), Sentinel::Value("none"));
        assert_eq!(
            sentinel_of(SectionKind::Texture, "surfaceImperfections"),
            Sentinel::Value("none")
        );
    }

    // --- Capture ---

    #[test]
    fn capture_line_matches_reference_output() {
        let b = bundle(json!({"capture": {
            "mediumType": "film",
            "cameraSystem": "Leica M6",
            "grainStructure": "fine"
        }}));
        assert_eq!(
            compile_section(SectionKind::Capture, &b).as_deref(),
            Some("CAPTURE: film photography; shot on Leica M6; fine grain.")
        );
    }

    #[test]
    fn clause_order_ignores_input_order() {
        let b = bundle(json!({"capture": {
            "grainStructure": "fine",
            "scanArtifacts": ["dust"],
            "cameraSystem": "Leica M6",
            "mediumType": "film"
        }}));
        assert_eq!(
            compile_section(SectionKind::Capture, &b).as_deref(),
            Some("CAPTURE: film photography; shot on Leica M6; fine grain; scan artifacts: dust.")
        );
    }

    #[test]
    fn scan_artifacts_drop_sentinel_tokens() {
        let b = bundle(json!({"capture": {"scanArtifacts": ["none", "light_leaks", "None"]}}));
        assert_eq!(
            compile_section(SectionKind::Capture, &b).as_deref(),
            Some("CAPTURE: scan artifacts: light leaks.")
        );
    }

    #[test]
    fn all_sentinel_capture_compiles_to_nothing() {
        let b = bundle(json!({"capture": {"grainStructure": "none", "scanArtifacts": ["none"]}}));
        assert_eq!(compile_section(SectionKind::Capture, &b), None);
    }

    #[test]
    fn sentinel_with_terminal_period_is_still_suppressed() {
        let b = bundle(json!({"capture": {"grainStructure": "none.", "scanArtifacts": ["None.", "dust."]}}));
        assert_eq!(
            compile_section(SectionKind::Capture, &b).as_deref(),
            Some("CAPTURE: scan artifacts: dust.")
        );

        let only = bundle(json!({"capture": {"grainStructure": " none. ", "scanArtifacts": ["none."]}}));
        assert_eq!(compile_section(SectionKind::Capture, &only), None);
    }

    // --- Sentinels elsewhere ---

    #[test]
    fn optical_sentinels_are_suppressed() {
        let b = bundle(json!({"optical": {
            "focusAccuracy": "perfect",
            "vignetting": "none",
            "halation": "NONE",
            "chromaticAberration": "none",
            "distortion": "none"
        }}));
        assert_eq!(compile_section(SectionKind::Optical, &b), None);
    }

    #[test]
    fn color_texture_and_retouching_sentinels_are_suppressed() {
        let b = bundle(json!({
            "color": {"colorCast": "None"},
            "texture": {"surfaceImperfections": ["none"]},
            "postProcess": {"retouchingLevel": "none"}
        }));
        assert_eq!(compile_section(SectionKind::Color, &b), None);
        assert_eq!(compile_section(SectionKind::Texture, &b), None);
        assert_eq!(compile_section(SectionKind::PostProcess, &b), None);
    }

    #[test]
    fn distortion_and_retouching_render_when_not_none() {
        let b = bundle(json!({
            "optical": {"distortion": "barrel"},
            "postProcess": {"retouchingLevel": "light"}
        }));
        assert_eq!(
            compile_section(SectionKind::Optical, &b).as_deref(),
            Some("OPTICAL: barrel lens distortion.")
        );
        assert_eq!(
            compile_section(SectionKind::PostProcess, &b).as_deref(),
            Some("POST-PROCESS: light retouching.")
        );
    }

    #[test]
    fn non_sentinel_optical_values_render() {
        let b = bundle(json!({"optical": {
            "lensType": "vintage_prime",
            "focalLength": 35,
            "focusAccuracy": "slightly_missed",
            "vignetting": "subtle"
        }}));
        assert_eq!(
            compile_section(SectionKind::Optical, &b).as_deref(),
            Some("OPTICAL: vintage prime lens; focal length: 35; focus: slightly missed; subtle vignetting.")
        );
    }

    #[test]
    fn level_horizon_is_suppressed() {
        let level = bundle(json!({"composition": {"horizonBehavior": "level"}}));
        assert_eq!(compile_section(SectionKind::Composition, &level), None);

        let tilted = bundle(json!({"composition": {"horizonBehavior": "slightly_tilted"}}));
        assert_eq!(
            compile_section(SectionKind::Composition, &tilted).as_deref(),
            Some("COMPOSITION: horizon: slightly tilted.")
        );
    }

    #[test]
    fn light_imperfections_only_none_is_suppressed() {
        let b = bundle(json!({"light": {"lightImperfections": ["none"]}}));
        assert_eq!(compile_section(SectionKind::Light, &b), None);
    }

    // --- Flags ---

    #[test]
    fn forbidden_behaviors_use_negated_phrasing() {
        let b = bundle(json!({
            "texture": {"skinSmoothing": false},
            "postProcess": {"hdrForbidden": true}
        }));
        assert_eq!(
            compile_section(SectionKind::Texture, &b).as_deref(),
            Some("TEXTURE: NO skin smoothing.")
        );
        assert_eq!(
            compile_section(SectionKind::PostProcess, &b).as_deref(),
            Some("POST-PROCESS: NO HDR.")
        );
    }

    #[test]
    fn unenforced_flags_add_nothing() {
        let b = bundle(json!({
            "texture": {"skinSmoothing": true},
            "postProcess": {"hdrForbidden": false}
        }));
        assert_eq!(compile_section(SectionKind::Texture, &b), None);
        assert_eq!(compile_section(SectionKind::PostProcess, &b), None);
    }

    // --- Normalization ---

    #[test]
    fn values_are_normalized_without_case_change() {
        let b = bundle(json!({"color": {"dominantPalette": "Muted_Earth", "contrast": "high_contrast"}}));
        assert_eq!(
            compile_section(SectionKind::Color, &b).as_deref(),
            Some("COLOR: Muted Earth palette; high contrast.")
        );
    }

    #[test]
    fn trailing_periods_do_not_double() {
        let b = bundle(json!({"era": {"aesthetic": "late disco."}}));
        assert_eq!(
            compile_section(SectionKind::Era, &b).as_deref(),
            Some("ERA: late disco aesthetic.")
        );
    }

    #[test]
    fn blank_values_are_absent() {
        let b = bundle(json!({"light": {"primaryLightType": "  ", "lightImperfections": ["", " "]}}));
        assert_eq!(compile_section(SectionKind::Light, &b), None);
    }

    #[test]
    fn unknown_keys_are_not_compiled() {
        let b = bundle(json!({"era": {"decade": "1970s", "vibe": "groovy"}}));
        assert_eq!(
            compile_section(SectionKind::Era, &b).as_deref(),
            Some("ERA: 1970s era.")
        );
    }

    // --- Ordering ---

    #[test]
    fn sections_follow_fixed_order() {
        let b = bundle(json!({
            "era": {"decade": "1990s"},
            "capture": {"mediumType": "digital"},
            "postProcess": {"hdrForbidden": true},
            "light": {"primaryLightType": "window"}
        }));
        let kinds: Vec<SectionKind> = compile_sections(&b).into_iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Capture,
                SectionKind::Light,
                SectionKind::PostProcess,
                SectionKind::Era
            ]
        );
    }

    #[test]
    fn empty_bundle_compiles_to_no_lines() {
        assert!(compile_sections(&ParameterBundle::default()).is_empty());
    }
}
