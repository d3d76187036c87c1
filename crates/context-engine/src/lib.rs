//! Context engine: a small scene-driven 2D engine on winit + wgpu.
//!
//! An [`Engine`] owns a list of [`Scene`]s and one window. Each frame the
//! active scene gets `update` with an [`EngineCtx`] (input, time, window size)
//! and then `render` with a [`Canvas`] that records shapes and text. The canvas
//! output is drawn in recording order in a single render pass.

pub mod canvas;
pub mod coords;
pub mod core;
pub mod device;
pub mod draw;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod rng;
pub mod text;
pub mod time;
mod window;

pub use canvas::{Camera, Canvas, FillMode};
pub use coords::{Rect, Vec2};
pub use crate::core::{Engine, EngineConfig, EngineCtx, FontSource, Scene};
pub use input::{InputEvent, Key, MouseButton};
pub use logging::{init_logging, LoggingConfig};
pub use paint::Color;
pub use rng::Rng;
