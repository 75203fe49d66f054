//! Typed parameter groups for creative-direction records.
//!
//! Every group is a flat record of optional text, boolean, or list-of-text
//! fields keyed by the camelCase names the persistence layer uses. Keys outside
//! the schema are kept in `extra` so a record survives a round trip untouched;
//! the compiler never reads them.

use std::collections::BTreeMap;

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unknown keys carried alongside a typed record, ordered for stable output.
pub type Extra = BTreeMap<String, Value>;

// ---------------------------------------------------------------------------
// Field views
// ---------------------------------------------------------------------------

/// The value shape of a known field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Flag,
    List,
}

/// Borrowed view of one known field, independent of the group it lives in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Absent,
    Text(&'a str),
    Flag(bool),
    List(&'a [String]),
}

impl FieldValue<'_> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Storage for a single known field: how it decodes, how it is viewed, and
/// how an overriding layer replaces it.
pub trait FieldSlot: Sized + Clone {
    const KIND: FieldKind;

    fn view(&self) -> FieldValue<'_>;

    fn from_json(value: Value) -> Result<Self, String>;

    /// Value after laying `self` over `base`. Present values win.
    fn overlay(&self, base: &Self) -> Self;
}

impl FieldSlot for Option<String> {
    const KIND: FieldKind = FieldKind::Text;

    fn view(&self) -> FieldValue<'_> {
        match self.as_deref() {
            Some(text) => FieldValue::Text(text),
            None => FieldValue::Absent,
        }
    }

    fn from_json(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => scalar_text(other).map(Some),
        }
    }

    fn overlay(&self, base: &Self) -> Self {
        self.clone().or_else(|| base.clone())
    }
}

impl FieldSlot for Option<bool> {
    const KIND: FieldKind = FieldKind::Flag;

    fn view(&self) -> FieldValue<'_> {
        match self {
            Some(flag) => FieldValue::Flag(*flag),
            None => FieldValue::Absent,
        }
    }

    fn from_json(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            Value::Bool(flag) => Ok(Some(flag)),
            other => Err(format!("expected boolean, found {}", json_kind(&other))),
        }
    }

    fn overlay(&self, base: &Self) -> Self {
        self.or(*base)
    }
}

impl FieldSlot for Option<Vec<String>> {
    const KIND: FieldKind = FieldKind::List;

    fn view(&self) -> FieldValue<'_> {
        match self.as_deref() {
            Some(items) => FieldValue::List(items),
            None => FieldValue::Absent,
        }
    }

    /// Accepts an array of scalars, or a single scalar as a one-item list.
    fn from_json(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            Value::Array(items) => items
                .into_iter()
                .map(scalar_text)
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            other => scalar_text(other).map(|text| Some(vec![text])),
        }
    }

    fn overlay(&self, base: &Self) -> Self {
        self.clone().or_else(|| base.clone())
    }
}

impl FieldSlot for Option<PoseProfile> {
    const KIND: FieldKind = FieldKind::Text;

    fn view(&self) -> FieldValue<'_> {
        match self {
            Some(profile) => FieldValue::Text(profile.as_str()),
            None => FieldValue::Absent,
        }
    }

    fn from_json(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => PoseProfile::parse(&s).map(Some),
            other => Err(format!("expected pose profile, found {}", json_kind(&other))),
        }
    }

    /// `auto` defers to the layer below instead of replacing it.
    fn overlay(&self, base: &Self) -> Self {
        match self {
            Some(profile) if !profile.is_auto() => Some(*profile),
            _ => base.or(*self),
        }
    }
}

fn scalar_text(value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(format!("expected text, found {}", json_kind(&other))),
    }
}

/// Short JSON type name for error messages and logs.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FieldSlot,
{
    let value = Value::deserialize(deserializer)?;
    T::from_json(value).map_err(D::Error::custom)
}

/// Decode a group, dropping (with a warning) values that are not objects.
fn lenient_group<'de, D, G>(deserializer: D) -> Result<Option<G>, D::Error>
where
    D: Deserializer<'de>,
    G: ParamGroup + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        Value::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(D::Error::custom),
        other => {
            tracing::warn!(
                group = G::GROUP_KEY,
                found = json_kind(&other),
                "Ignoring malformed parameter group"
            );
            Ok(None)
        }
    }
}

fn merge_extra(overlay: &Extra, base: &Extra) -> Extra {
    let mut merged = base.clone();
    for (key, value) in overlay {
        if !value.is_null() {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

// ---------------------------------------------------------------------------
// Pose profile
// ---------------------------------------------------------------------------

/// How much pose guidance the Anti-AI directives carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseProfile {
    /// Defer to the next-lower layer.
    #[default]
    Auto,
    Natural,
    Posed,
    Off,
}

/// All accepted pose profile spellings.
pub const VALID_POSE_PROFILES: &[&str] = &["auto", "natural", "posed", "off"];

impl PoseProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Natural => "natural",
            Self::Posed => "posed",
            Self::Off => "off",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(Self::Auto),
            "natural" => Ok(Self::Natural),
            "posed" => Ok(Self::Posed),
            "off" => Ok(Self::Off),
            _ => Err(format!(
                "Invalid poseProfile '{s}'. Must be one of: {}",
                VALID_POSE_PROFILES.join(", ")
            )),
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl std::fmt::Display for PoseProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Group trait and declaration macro
// ---------------------------------------------------------------------------

/// A typed parameter group.
pub trait ParamGroup: Clone + Default {
    /// Key of the group inside a parameter bundle.
    const GROUP_KEY: &'static str;

    /// Known field keys with their kinds, in schema order.
    const FIELDS: &'static [(&'static str, FieldKind)];

    /// View a known field by its JSON key. Unknown keys are `Absent`.
    fn field(&self, key: &str) -> FieldValue<'_>;

    fn extra(&self) -> &Extra;

    /// Field-wise shallow merge: fields present in `self` replace `base`.
    fn merged_over(&self, base: &Self) -> Self;

    /// True when no known field is set and no unknown key is carried.
    fn is_empty(&self) -> bool {
        self.extra().is_empty() && Self::FIELDS.iter().all(|(key, _)| self.field(key).is_absent())
    }
}

macro_rules! param_group {
    (
        $(#[$meta:meta])*
        pub struct $name:ident in $group_key:literal {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty => $key:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            $(
                $(#[$fmeta])*
                #[serde(
                    rename = $key,
                    default,
                    skip_serializing_if = "Option::is_none",
                    deserialize_with = "lenient"
                )]
                pub $field: $ty,
            )*
            /// Keys outside the schema, preserved but never compiled.
            #[serde(flatten)]
            pub extra: Extra,
        }

        impl ParamGroup for $name {
            const GROUP_KEY: &'static str = $group_key;

            const FIELDS: &'static [(&'static str, FieldKind)] =
                &[ $( ($key, <$ty as FieldSlot>::KIND), )* ];

            fn field(&self, key: &str) -> FieldValue<'_> {
                match key {
                    $( $key => self.$field.view(), )*
                    _ => FieldValue::Absent,
                }
            }

            fn extra(&self) -> &Extra {
                &self.extra
            }

            fn merged_over(&self, base: &Self) -> Self {
                Self {
                    $( $field: self.$field.overlay(&base.$field), )*
                    extra: merge_extra(&self.extra, &base.extra),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

param_group! {
    /// How the image was captured: medium, body, stock, grain, scan defects.
    pub struct CaptureParams in "capture" {
        medium_type: Option<String> => "mediumType",
        camera_system: Option<String> => "cameraSystem",
        film_stock: Option<String> => "filmStock",
        grain_structure: Option<String> => "grainStructure",
        scan_artifacts: Option<Vec<String>> => "scanArtifacts",
    }
}

param_group! {
    pub struct LightParams in "light" {
        primary_light_type: Option<String> => "primaryLightType",
        light_direction: Option<String> => "lightDirection",
        shadow_behavior: Option<String> => "shadowBehavior",
        color_temperature: Option<String> => "colorTemperature",
        light_imperfections: Option<Vec<String>> => "lightImperfections",
    }
}

param_group! {
    pub struct ColorParams in "color" {
        dominant_palette: Option<String> => "dominantPalette",
        saturation: Option<String> => "saturation",
        contrast: Option<String> => "contrast",
        white_balance: Option<String> => "whiteBalance",
        color_cast: Option<String> => "colorCast",
        skin_tone_rendering: Option<String> => "skinToneRendering",
    }
}

param_group! {
    pub struct TextureParams in "texture" {
        skin_texture: Option<String> => "skinTexture",
        /// `false` means smoothing is actively forbidden.
        skin_smoothing: Option<bool> => "skinSmoothing",
        fabric_detail: Option<String> => "fabricDetail",
        surface_imperfections: Option<Vec<String>> => "surfaceImperfections",
    }
}

param_group! {
    pub struct OpticalParams in "optical" {
        lens_type: Option<String> => "lensType",
        focal_length: Option<String> => "focalLength",
        aperture: Option<String> => "aperture",
        depth_of_field: Option<String> => "depthOfField",
        focus_accuracy: Option<String> => "focusAccuracy",
        vignetting: Option<String> => "vignetting",
        halation: Option<String> => "halation",
        chromatic_aberration: Option<String> => "chromaticAberration",
        distortion: Option<String> => "distortion",
    }
}

param_group! {
    pub struct CompositionParams in "composition" {
        framing: Option<String> => "framing",
        camera_angle: Option<String> => "cameraAngle",
        subject_placement: Option<String> => "subjectPlacement",
        horizon_behavior: Option<String> => "horizonBehavior",
        negative_space: Option<String> => "negativeSpace",
    }
}

param_group! {
    pub struct PostProcessParams in "postProcess" {
        editing_style: Option<String> => "editingStyle",
        tone_curve: Option<String> => "toneCurve",
        sharpening: Option<String> => "sharpening",
        hdr_forbidden: Option<bool> => "hdrForbidden",
        retouching_level: Option<String> => "retouchingLevel",
    }
}

param_group! {
    pub struct EraParams in "era" {
        decade: Option<String> => "decade",
        aesthetic: Option<String> => "aesthetic",
        cultural_references: Option<Vec<String>> => "culturalReferences",
        anachronisms_forbidden: Option<bool> => "anachronismsForbidden",
    }
}

param_group! {
    /// Frame defaults shown to operators; not part of the compiled prompt.
    pub struct FrameParams in "defaultFrameParams" {
        aspect_ratio: Option<String> => "aspectRatio",
        orientation: Option<String> => "orientation",
        resolution: Option<String> => "resolution",
    }
}

param_group! {
    /// Realism toggles that steer generation away from telltale AI artifacts.
    pub struct AntiAiSettings in "antiAi" {
        pose_profile: Option<PoseProfile> => "poseProfile",
        level: Option<String> => "level",
        key_light: Option<String> => "keyLight",
        allow_motion_blur: Option<bool> => "allowMotionBlur",
        allow_missed_focus: Option<bool> => "allowMissedFocus",
        require_skin_texture: Option<bool> => "requireSkinTexture",
        require_asymmetry: Option<bool> => "requireAsymmetry",
        forbidden_phrases: Option<Vec<String>> => "forbiddenPhrases",
        notes: Option<String> => "notes",
    }
}

impl AntiAiSettings {
    /// The pose profile with absence read as `auto`.
    pub fn pose(&self) -> PoseProfile {
        self.pose_profile.unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// The full set of parameter groups carried by a Universe, or the partial set
/// a Style Preset overrides.
///
/// Top-level keys outside the known groups land in `extra`. When the bundle
/// is flattened into a Universe, that includes the Universe's own unknown keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterBundle {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_group")]
    pub capture: Option<CaptureParams>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_group")]
    pub light: Option<LightParams>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_group")]
    pub color: Option<ColorParams>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_group")]
    pub texture: Option<TextureParams>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_group")]
    pub optical: Option<OpticalParams>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_group")]
    pub composition: Option<CompositionParams>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_group")]
    pub post_process: Option<PostProcessParams>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_group")]
    pub era: Option<EraParams>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_group")]
    pub default_frame_params: Option<FrameParams>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_group")]
    pub anti_ai: Option<AntiAiSettings>,
    #[serde(flatten)]
    pub extra: Extra,
}

fn merge_group<G: ParamGroup>(overlay: &Option<G>, base: &Option<G>) -> Option<G> {
    match (overlay, base) {
        (Some(over), Some(under)) => Some(over.merged_over(under)),
        (Some(over), None) => Some(over.clone()),
        (None, under) => under.clone(),
    }
}

impl ParameterBundle {
    /// Lay `self` over `base` group by group, field by field.
    pub fn merged_over(&self, base: &Self) -> Self {
        Self {
            capture: merge_group(&self.capture, &base.capture),
            light: merge_group(&self.light, &base.light),
            color: merge_group(&self.color, &base.color),
            texture: merge_group(&self.texture, &base.texture),
            optical: merge_group(&self.optical, &base.optical),
            composition: merge_group(&self.composition, &base.composition),
            post_process: merge_group(&self.post_process, &base.post_process),
            era: merge_group(&self.era, &base.era),
            default_frame_params: merge_group(&self.default_frame_params, &base.default_frame_params),
            anti_ai: merge_group(&self.anti_ai, &base.anti_ai),
            extra: merge_extra(&self.extra, &base.extra),
        }
    }

    /// Number of unknown keys carried at the top level and across every group.
    pub fn unknown_key_count(&self) -> usize {
        fn count<G: ParamGroup>(group: &Option<G>) -> usize {
            group.as_ref().map_or(0, |g| g.extra().len())
        }
        count(&self.capture)
            + count(&self.light)
            + count(&self.color)
            + count(&self.texture)
            + count(&self.optical)
            + count(&self.composition)
            + count(&self.post_process)
            + count(&self.era)
            + count(&self.default_frame_params)
            + count(&self.anti_ai)
            + self.extra.len()
    }
}
