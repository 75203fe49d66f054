//! Creative-direction records: Universe, Style Preset, Shoot and Scene.
//!
//! These are the in-memory shapes the compiler accepts. They decode from the
//! JSON bodies the persistence layer serves and encode back without losing
//! keys the schema does not know about.

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::schema::params::{AntiAiSettings, Extra, ParameterBundle, PoseProfile};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Universe
// ---------------------------------------------------------------------------

/// A named place a scene can be set in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_snippet: Option<String>,
}

/// Top-level visual-style parameter bundle shared across shoots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Universe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    /// The nine parameter groups plus the baseline Anti-AI settings. Unknown
    /// top-level keys are kept in `params.extra`.
    #[serde(flatten)]
    pub params: ParameterBundle,
    #[serde(default)]
    pub locations: Vec<Location>,
}

impl Universe {
    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        serde_json::from_str(text).map_err(|e| CoreError::schema("universe", e))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, CoreError> {
        serde_json::from_value(value).map_err(|e| CoreError::schema("universe", e))
    }

    /// Find a location by label, ignoring case and surrounding whitespace.
    pub fn location(&self, label: &str) -> Option<&Location> {
        find_location(&self.locations, label)
    }
}

/// Case-insensitive location lookup by label.
pub fn find_location<'a>(locations: &'a [Location], label: &str) -> Option<&'a Location> {
    let wanted = label.trim();
    if wanted.is_empty() {
        return None;
    }
    locations
        .iter()
        .find(|loc| loc.label.trim().eq_ignore_ascii_case(wanted))
}

// ---------------------------------------------------------------------------
// Style preset
// ---------------------------------------------------------------------------

/// An alternate rendering layered on top of the base compiled prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub prompt_suffix: String,
}

/// A named, reusable override layer on top of a Universe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePreset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    #[serde(default)]
    pub technical_params: ParameterBundle,
    /// Cached compiled text. Derived; never a source of truth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_prompt: Option<String>,
    #[serde(default)]
    pub anti_ai_directives: Vec<String>,
    #[serde(default)]
    pub variations: Vec<Variation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl StylePreset {
    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        serde_json::from_str(text).map_err(|e| CoreError::schema("style preset", e))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, CoreError> {
        serde_json::from_value(value).map_err(|e| CoreError::schema("style preset", e))
    }

    pub fn variation(&self, id: &str) -> Option<&Variation> {
        let wanted = id.trim();
        self.variations.iter().find(|v| v.id.trim() == wanted)
    }

    /// Look up a variation, failing with `NotFound` for unknown ids.
    pub fn require_variation(&self, id: &str) -> Result<&Variation, CoreError> {
        self.variation(id).ok_or_else(|| CoreError::NotFound {
            entity: "variation",
            id: id.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Shoot and scene
// ---------------------------------------------------------------------------

/// Scene-level Anti-AI override. Only the pose profile can be overridden.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneAntiAi {
    #[serde(default, deserialize_with = "pose_or_auto")]
    pub pose_profile: PoseProfile,
}

fn pose_or_auto<'de, D>(deserializer: D) -> Result<PoseProfile, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => PoseProfile::parse(&raw).map_err(D::Error::custom),
        None => Ok(PoseProfile::Auto),
    }
}

/// One shot within a Shoot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clothing_focus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    #[serde(default)]
    pub anti_ai: SceneAntiAi,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Scene {
    pub fn pose_profile(&self) -> PoseProfile {
        self.anti_ai.pose_profile
    }
}

/// A Shoot's universe, either referenced by id or embedded in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UniverseRef {
    Id(DbId),
    Embedded(Box<Universe>),
}

/// A photo shoot: a universe, an optional preset, and its ordered scenes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shoot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    #[serde(default)]
    pub label: String,
    pub universe: UniverseRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_preset_id: Option<DbId>,
    /// Shoot-level Anti-AI settings, laid over the universe/preset baseline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anti_ai: Option<AntiAiSettings>,
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Shoot {
    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        serde_json::from_str(text).map_err(|e| CoreError::schema("shoot", e))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, CoreError> {
        serde_json::from_value(value).map_err(|e| CoreError::schema("shoot", e))
    }

    pub fn embedded_universe(&self) -> Option<&Universe> {
        match &self.universe {
            UniverseRef::Embedded(universe) => Some(universe),
            UniverseRef::Id(_) => None,
        }
    }

    pub fn universe_id(&self) -> Option<DbId> {
        match &self.universe {
            UniverseRef::Id(id) => Some(*id),
            UniverseRef::Embedded(universe) => universe.id,
        }
    }

    /// Label used in logs and errors: the label, else the id, else `"unnamed"`.
    pub fn display_name(&self) -> String {
        if !self.label.trim().is_empty() {
            self.label.clone()
        } else if let Some(id) = self.id {
            id.to_string()
        } else {
            "unnamed".to_string()
        }
    }
}
