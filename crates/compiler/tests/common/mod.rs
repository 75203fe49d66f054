//! Shared fixtures for compiler integration tests.
#![allow(dead_code)]

use std::sync::Once;

use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atelier_core::schema::{Shoot, StylePreset, Universe};

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary so `debug!` output
/// shows up with `--nocapture`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "atelier_compiler=debug,atelier_core=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}

/// A film-look universe with a muted palette and natural posing.
pub fn coastal_universe() -> Universe {
    Universe::from_value(json!({
        "id": 1,
        "name": "Coastal 70s",
        "capture": {
            "mediumType": "film",
            "cameraSystem": "Leica M6",
            "grainStructure": "fine",
            "scanArtifacts": ["none"]
        },
        "light": {
            "primaryLightType": "window",
            "shadowBehavior": "soft",
            "lightImperfections": ["none"]
        },
        "color": {
            "dominantPalette": "muted",
            "contrast": "low_contrast",
            "colorCast": "none"
        },
        "optical": {
            "focusAccuracy": "perfect",
            "vignetting": "none"
        },
        "composition": {"horizonBehavior": "level"},
        "era": {"decade": "1970s", "anachronismsForbidden": true},
        "defaultFrameParams": {"aspectRatio": "4:5"},
        "antiAi": {
            "poseProfile": "natural",
            "level": "moderate",
            "forbiddenPhrases": ["plastic skin"]
        },
        "locations": [{
            "category": "exterior",
            "label": "Boardwalk",
            "description": "Sun-bleached boardwalk",
            "promptSnippet": "sun-bleached boardwalk at golden hour"
        }],
        "moodBoard": {"pins": 12}
    }))
    .expect("fixture universe decodes")
}

/// A preset that swaps the palette to vivid and offers a B&W variation.
pub fn vivid_preset() -> StylePreset {
    StylePreset::from_value(json!({
        "id": 10,
        "name": "Vivid Summer",
        "technicalParams": {
            "color": {"dominantPalette": "vivid"},
            "postProcess": {"hdrForbidden": true}
        },
        "antiAiDirectives": ["Keep pores visible"],
        "variations": [
            {"id": "bw", "label": "Black & white", "promptSuffix": "black and white"}
        ]
    }))
    .expect("fixture preset decodes")
}

/// A two-scene shoot referencing universe 1 and preset 10.
pub fn boardwalk_shoot() -> Shoot {
    Shoot::from_value(json!({
        "id": 100,
        "label": "Boardwalk day",
        "universe": 1,
        "stylePresetId": 10,
        "antiAi": {"level": "strict", "requireSkinTexture": true},
        "scenes": [
            {
                "id": "opening",
                "role": "lead",
                "space": "boardwalk",
                "action": "walking_away",
                "antiAi": {"poseProfile": "posed"}
            },
            {
                "id": "close",
                "role": "lead",
                "emotion": "wistful",
                "antiAi": {"poseProfile": "auto"}
            }
        ]
    }))
    .expect("fixture shoot decodes")
}
