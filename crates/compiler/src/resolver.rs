//! Inheritance resolution across the four override layers.
//!
//! Precedence, low to high:
//!
//! 1. Universe baseline groups (including baseline Anti-AI settings).
//! 2. Style Preset `technicalParams`, merged field by field.
//! 3. Shoot-level Anti-AI settings (Anti-AI group only).
//! 4. Scene `antiAi.poseProfile` (that one field, only when not `auto`).
//!
//! Inputs are borrowed immutably and a fresh record is returned, so resolving
//! the same inputs twice yields identical results.

use serde::Serialize;

use atelier_core::schema::{
    AntiAiSettings, Location, ParamGroup, ParameterBundle, PoseProfile, Scene, StylePreset,
    Universe,
};

/// The override layer a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Universe,
    StylePreset,
    Shoot,
    Scene,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Universe => "universe",
            Self::StylePreset => "style_preset",
            Self::Shoot => "shoot",
            Self::Scene => "scene",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fully resolved parameter record for one generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveParams {
    pub params: ParameterBundle,
    /// Layer that supplied the concrete pose profile; `None` while it is
    /// still `auto`.
    pub pose_source: Option<Layer>,
    /// Universe locations, carried for scene briefs.
    pub locations: Vec<Location>,
}

impl EffectiveParams {
    /// Wrap an already-merged bundle, e.g. one rebuilt from storage.
    pub fn from_bundle(params: ParameterBundle) -> Self {
        let pose_source = params
            .anti_ai
            .as_ref()
            .filter(|a| !a.pose().is_auto())
            .map(|_| Layer::Universe);
        Self {
            params,
            pose_source,
            locations: Vec::new(),
        }
    }

    /// Effective Anti-AI settings; empty when no layer defined any.
    pub fn anti_ai(&self) -> AntiAiSettings {
        self.params.anti_ai.clone().unwrap_or_default()
    }

    pub fn pose_profile(&self) -> PoseProfile {
        self.params
            .anti_ai
            .as_ref()
            .map(AntiAiSettings::pose)
            .unwrap_or_default()
    }
}

fn concrete_pose(settings: Option<&AntiAiSettings>) -> Option<PoseProfile> {
    settings.map(AntiAiSettings::pose).filter(|p| !p.is_auto())
}

/// Resolve the effective parameters for one scene.
pub fn resolve(
    universe: &Universe,
    style_preset: Option<&StylePreset>,
    shoot_overrides: Option<&AntiAiSettings>,
    scene: Option<&Scene>,
) -> EffectiveParams {
    let mut params = universe.params.clone();
    let mut pose_source = concrete_pose(params.anti_ai.as_ref()).map(|_| Layer::Universe);

    if let Some(preset) = style_preset {
        params = preset.technical_params.merged_over(&params);
        if concrete_pose(preset.technical_params.anti_ai.as_ref()).is_some() {
            pose_source = Some(Layer::StylePreset);
        }
    }

    if let Some(shoot) = shoot_overrides {
        params.anti_ai = Some(match &params.anti_ai {
            Some(base) => shoot.merged_over(base),
            None => shoot.clone(),
        });
        if concrete_pose(Some(shoot)).is_some() {
            pose_source = Some(Layer::Shoot);
        }
    }

    if let Some(scene) = scene {
        let profile = scene.pose_profile();
        if !profile.is_auto() {
            params.anti_ai.get_or_insert_with(AntiAiSettings::default).pose_profile = Some(profile);
            pose_source = Some(Layer::Scene);
        }
    }

    let unknown_keys = params.unknown_key_count();
    if unknown_keys > 0 {
        tracing::debug!(unknown_keys, "Carrying unknown parameter keys through resolution");
    }

    let effective = EffectiveParams {
        params,
        pose_source,
        locations: universe.locations.clone(),
    };

    tracing::debug!(
        universe = %universe.name,
        style_preset = style_preset.map(|p| p.name.as_str()),
        shoot_overrides = shoot_overrides.is_some(),
        scene = scene.and_then(|s| s.id.as_deref()),
        pose_profile = %effective.pose_profile(),
        pose_source = pose_source.map(|l| l.as_str()),
        "Resolved effective parameters"
    );

    effective
}
