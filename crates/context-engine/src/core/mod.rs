//! Engine, scenes and the per-frame context scenes talk to.

mod config;
mod ctx;
mod engine;
mod scene;

pub use config::{EngineConfig, FontSource, FONT_PATH_ENV};
pub use ctx::EngineCtx;
pub use engine::Engine;
pub use scene::Scene;
