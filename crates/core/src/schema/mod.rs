//! Typed record schema for creative-direction data.

pub mod params;
pub mod records;

pub use params::{
    AntiAiSettings, CaptureParams, ColorParams, CompositionParams, EraParams, Extra, FieldKind,
    FieldValue, FrameParams, LightParams, OpticalParams, ParamGroup, ParameterBundle,
    PoseProfile, PostProcessParams, TextureParams,
};
pub use records::{
    find_location, Location, Scene, SceneAntiAi, Shoot, StylePreset, Universe, UniverseRef,
    Variation,
};
