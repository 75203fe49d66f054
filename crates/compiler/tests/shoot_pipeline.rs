//! Compiling whole shoots scene by scene.

mod common;

use assert_matches::assert_matches;
use serde_json::json;

use atelier_compiler::cache::{compile_natural_prompt, natural_prompt_is_stale, refresh_natural_prompt};
use atelier_compiler::directives::{NATURAL_POSE_DIRECTIVE, POSED_POSE_DIRECTIVE};
use atelier_compiler::{compile_shoot, Layer};
use atelier_core::error::CoreError;
use atelier_core::schema::{PoseProfile, Shoot, Universe};

use common::{boardwalk_shoot, coastal_universe, init_tracing, vivid_preset};

#[test]
fn each_scene_gets_its_own_prompt() {
    init_tracing();
    let compiled = compile_shoot(
        &boardwalk_shoot(),
        Some(&coastal_universe()),
        Some(&vivid_preset()),
        None,
    )
    .unwrap();

    assert_eq!(compiled.len(), 2);

    let opening = &compiled[0];
    assert_eq!(opening.scene_id.as_deref(), Some("opening"));
    assert_eq!(opening.effective.pose_profile(), PoseProfile::Posed);
    assert_eq!(opening.effective.pose_source, Some(Layer::Scene));
    assert!(opening.prompt.visual.starts_with(
        "SCENE: role: lead; setting: sun-bleached boardwalk at golden hour; action: walking away.\nCAPTURE:"
    ));
    assert_eq!(
        opening.prompt.directives,
        format!(
            "ANTI-AI DIRECTIVES:\n- Keep pores visible\n- {POSED_POSE_DIRECTIVE}\n- Realism level: strict\n- Require visible skin texture\nAVOID:\n- plastic skin"
        )
    );

    let close = &compiled[1];
    assert_eq!(close.effective.pose_profile(), PoseProfile::Natural);
    assert!(close.prompt.visual.starts_with("SCENE: role: lead; emotion: wistful.\n"));
    assert!(close.prompt.directives.contains(NATURAL_POSE_DIRECTIVE));
}

#[test]
fn variation_applies_to_every_scene() {
    let shoot = boardwalk_shoot();
    let universe = coastal_universe();
    let preset = vivid_preset();

    let plain = compile_shoot(&shoot, Some(&universe), Some(&preset), None).unwrap();
    let varied = compile_shoot(&shoot, Some(&universe), Some(&preset), Some("bw")).unwrap();

    for (base, bw) in plain.iter().zip(&varied) {
        assert_eq!(bw.prompt.text, format!("{}\nblack and white", base.prompt.text));
        assert_eq!(bw.prompt.visual, base.prompt.visual);
    }
}

#[test]
fn unknown_variation_fails_the_shoot() {
    let err = compile_shoot(
        &boardwalk_shoot(),
        Some(&coastal_universe()),
        Some(&vivid_preset()),
        Some("sepia"),
    )
    .unwrap_err();
    assert_matches!(err, CoreError::NotFound { entity: "variation", ref id } if id == "sepia");
}

#[test]
fn referenced_universe_must_be_supplied_and_match() {
    let shoot = boardwalk_shoot();

    let err = compile_shoot(&shoot, None, None, None).unwrap_err();
    assert_matches!(err, CoreError::MissingUniverse { .. });
    assert!(err.to_string().contains("Boardwalk day"));

    let other = Universe::from_value(json!({"id": 2, "name": "Noir"})).unwrap();
    let err = compile_shoot(&shoot, Some(&other), None, None).unwrap_err();
    assert_matches!(err, CoreError::MissingUniverse { .. });
}

#[test]
fn mismatched_preset_is_a_validation_error() {
    let mut preset = vivid_preset();
    preset.id = Some(11);
    let err = compile_shoot(&boardwalk_shoot(), Some(&coastal_universe()), Some(&preset), None)
        .unwrap_err();
    assert_matches!(err, CoreError::Validation(_));
}

#[test]
fn embedded_universe_needs_no_lookup() {
    let shoot = Shoot::from_value(json!({
        "label": "Studio",
        "universe": {"name": "Studio", "capture": {"mediumType": "digital"}},
        "scenes": [{"id": "one"}]
    }))
    .unwrap();

    let compiled = compile_shoot(&shoot, None, None, None).unwrap();
    assert_eq!(compiled[0].prompt.text, "CAPTURE: digital photography.");
}

#[test]
fn shoot_round_trips_from_json_text() {
    let text = serde_json::to_string(&boardwalk_shoot()).unwrap();
    let back = Shoot::from_json(&text).unwrap();
    assert_eq!(back, boardwalk_shoot());
}

// ---------------------------------------------------------------------------
// Cached natural prompt
// ---------------------------------------------------------------------------

#[test]
fn cached_natural_prompt_tracks_universe_changes() {
    let mut universe = coastal_universe();
    let mut preset = vivid_preset();

    assert!(refresh_natural_prompt(&universe, &mut preset));
    assert!(!natural_prompt_is_stale(&universe, &preset));
    assert_eq!(
        preset.natural_prompt.as_deref(),
        Some(compile_natural_prompt(&universe, &preset).as_str())
    );

    universe.params.era = None;
    assert!(natural_prompt_is_stale(&universe, &preset));
}
