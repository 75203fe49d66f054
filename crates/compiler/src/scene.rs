//! Scene and shoot compilation.
//!
//! Resolves one effective record per scene, prefixes the visual block with a
//! `SCENE:` brief built from the scene's free-text fields, and applies an
//! optional Style Preset variation.

use serde::Serialize;

use atelier_core::error::CoreError;
use atelier_core::schema::{
    find_location, AntiAiSettings, Location, Scene, Shoot, StylePreset, Universe,
};

use crate::assembler::{compile_visual_block, finish, render_directive_block, AssembledPrompt};
use crate::config::CompilerConfig;
use crate::directives::render_directives;
use crate::normalize::{normalize_text, trim_terminal_period};
use crate::resolver::{resolve, EffectiveParams};

/// Title of the scene brief line.
pub const SCENE_SECTION_TITLE: &str = "SCENE";

/// Everything needed to compile one scene's prompt.
#[derive(Debug, Clone, Copy)]
pub struct SceneRequest<'a> {
    pub universe: &'a Universe,
    pub style_preset: Option<&'a StylePreset>,
    pub shoot_overrides: Option<&'a AntiAiSettings>,
    pub scene: Option<&'a Scene>,
    /// Variation id on the style preset.
    pub variation_id: Option<&'a str>,
}

impl<'a> SceneRequest<'a> {
    pub fn new(universe: &'a Universe) -> Self {
        Self {
            universe,
            style_preset: None,
            shoot_overrides: None,
            scene: None,
            variation_id: None,
        }
    }
}

/// A compiled scene prompt with the record it was compiled from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledScenePrompt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<String>,
    pub effective: EffectiveParams,
    pub prompt: AssembledPrompt,
}

/// Build the `SCENE:` line from a scene's free-text fields.
///
/// Field order: role, setting, action, pose, emotion, lighting, camera,
/// clothing focus, texture. A `space` naming a universe location uses the
/// location's prompt snippet (or description) instead of the bare label.
pub fn compile_scene_brief(scene: &Scene, locations: &[Location]) -> Option<String> {
    let setting = scene.space.as_deref().map(|space| {
        find_location(locations, space)
            .and_then(location_text)
            .unwrap_or(space)
    });

    let fields: [(&str, &str, Option<&str>); 9] = [
        ("role", "role", scene.role.as_deref()),
        ("space", "setting", setting),
        ("action", "action", scene.action.as_deref()),
        ("pose", "pose", scene.pose.as_deref()),
        ("emotion", "emotion", scene.emotion.as_deref()),
        ("lighting", "lighting", scene.lighting.as_deref()),
        ("camera", "camera", scene.camera.as_deref()),
        ("clothingFocus", "clothing focus", scene.clothing_focus.as_deref()),
        ("texture", "texture", scene.texture.as_deref()),
    ];

    let clauses: Vec<String> = fields
        .into_iter()
        .filter_map(|(key, label, raw)| {
            let text = normalize_text(key, raw?);
            let text = trim_terminal_period(&text);
            (!text.is_empty()).then(|| format!("{label}: {text}"))
        })
        .collect();

    if clauses.is_empty() {
        None
    } else {
        Some(format!("{SCENE_SECTION_TITLE}: {}.", clauses.join("; ")))
    }
}

fn location_text(location: &Location) -> Option<&str> {
    location
        .prompt_snippet
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| Some(location.description.trim()).filter(|s| !s.is_empty()))
}

/// Compile with the default configuration.
pub fn compile_scene(request: SceneRequest<'_>) -> Result<CompiledScenePrompt, CoreError> {
    compile_scene_prompt(&CompilerConfig::default(), request)
}

/// Resolve and assemble one scene.
///
/// Fails with `NotFound` when `variation_id` names no variation on the
/// preset, or when a variation is requested without a preset.
pub fn compile_scene_prompt(
    config: &CompilerConfig,
    request: SceneRequest<'_>,
) -> Result<CompiledScenePrompt, CoreError> {
    let suffix = match request.variation_id {
        Some(id) => {
            let preset = request.style_preset.ok_or_else(|| CoreError::NotFound {
                entity: "variation",
                id: id.to_string(),
            })?;
            Some(preset.require_variation(id)?.prompt_suffix.as_str())
        }
        None => None,
    };

    let effective = resolve(
        request.universe,
        request.style_preset,
        request.shoot_overrides,
        request.scene,
    );

    let brief = request
        .scene
        .and_then(|scene| compile_scene_brief(scene, &effective.locations));
    let sections = compile_visual_block(&effective.params);
    let visual = match brief {
        Some(brief) if sections.is_empty() => brief,
        Some(brief) => format!("{brief}\n{sections}"),
        None => sections,
    };

    let caller_directives = request
        .style_preset
        .map(|p| p.anti_ai_directives.as_slice())
        .unwrap_or_default();
    let rendered = render_directives(&effective.anti_ai());
    let directives = render_directive_block(config, caller_directives, &rendered);

    let prompt = finish(config, visual, directives, suffix);

    tracing::debug!(
        scene = request.scene.and_then(|s| s.id.as_deref()),
        variation = request.variation_id,
        estimated_tokens = prompt.estimated_tokens,
        "Compiled scene prompt"
    );

    Ok(CompiledScenePrompt {
        scene_id: request.scene.and_then(|s| s.id.clone()),
        effective,
        prompt,
    })
}

/// Pick the universe a shoot compiles against.
///
/// An embedded universe wins. A referenced id must match the supplied
/// universe's id.
pub fn shoot_universe<'a>(
    shoot: &'a Shoot,
    supplied: Option<&'a Universe>,
) -> Result<&'a Universe, CoreError> {
    if let Some(embedded) = shoot.embedded_universe() {
        return Ok(embedded);
    }

    let missing = |reason: String| CoreError::MissingUniverse {
        shoot: shoot.display_name(),
        reason,
    };

    let wanted = shoot.universe_id();
    match supplied {
        None => Err(missing(match wanted {
            Some(id) => format!("universe {id} was not supplied"),
            None => "no universe referenced or supplied".to_string(),
        })),
        Some(universe) => match (wanted, universe.id) {
            (Some(wanted), Some(got)) if wanted == got => Ok(universe),
            (Some(wanted), got) => Err(missing(format!(
                "shoot references universe {wanted} but {} was supplied",
                got.map_or_else(|| "an unidentified universe".to_string(), |id| format!("universe {id}"))
            ))),
            (None, _) => Ok(universe),
        },
    }
}

/// Compile every scene of a shoot, in scene order, with the default
/// configuration.
pub fn compile_shoot(
    shoot: &Shoot,
    universe: Option<&Universe>,
    style_preset: Option<&StylePreset>,
    variation_id: Option<&str>,
) -> Result<Vec<CompiledScenePrompt>, CoreError> {
    compile_shoot_with(
        &CompilerConfig::default(),
        shoot,
        universe,
        style_preset,
        variation_id,
    )
}

/// Compile every scene of a shoot, in scene order.
///
/// A shoot that names a `style_preset_id` must be given that preset. A missing
/// preset, or one whose id differs, is a `Validation` error.
pub fn compile_shoot_with(
    config: &CompilerConfig,
    shoot: &Shoot,
    universe: Option<&Universe>,
    style_preset: Option<&StylePreset>,
    variation_id: Option<&str>,
) -> Result<Vec<CompiledScenePrompt>, CoreError> {
    let universe = shoot_universe(shoot, universe)?;

    if let Some(expected) = shoot.style_preset_id {
        match style_preset {
            None => {
                return Err(CoreError::Validation(format!(
                    "Shoot '{}' uses style preset {expected}, but no preset was supplied",
                    shoot.display_name()
                )));
            }
            Some(preset) if preset.id.is_some_and(|id| id != expected) => {
                return Err(CoreError::Validation(format!(
                    "Shoot '{}' uses style preset {expected}, but preset '{}' was supplied",
                    shoot.display_name(),
                    preset.name
                )));
            }
            Some(_) => {}
        }
    }

    let compiled = shoot
        .scenes
        .iter()
        .map(|scene| {
            compile_scene_prompt(
                config,
                SceneRequest {
                    universe,
                    style_preset,
                    shoot_overrides: shoot.anti_ai.as_ref(),
                    scene: Some(scene),
                    variation_id,
                },
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        shoot = %shoot.display_name(),
        scenes = compiled.len(),
        "Compiled shoot"
    );

    Ok(compiled)
}
