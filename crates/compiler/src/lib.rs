//! Creative parameter compiler.
//!
//! Resolves Universe, Style Preset, Shoot and Scene records into one effective
//! parameter set and compiles it into deterministic prompt text, plus a
//! flattened listing for display.

pub mod assembler;
pub mod cache;
pub mod config;
pub mod directives;
pub mod display;
pub mod normalize;
pub mod resolver;
pub mod scene;
pub mod sections;

pub use assembler::{assemble, assemble_parts, assemble_with, AssembledPrompt};
pub use config::{CompilerConfig, DirectiveLayout};
pub use display::{flatten_for_display, flatten_for_display_with, DisplayEntry};
pub use resolver::{resolve, EffectiveParams, Layer};
pub use scene::{
    compile_scene, compile_scene_brief, compile_scene_prompt, compile_shoot, compile_shoot_with,
    CompiledScenePrompt, SceneRequest,
};
