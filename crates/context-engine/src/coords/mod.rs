//! Geometry in logical pixels: origin top-left, +x right, +y down.
//!
//! The canvas camera maps world positions into this space; shaders take it
//! the rest of the way to clip space through [`Viewport`].

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
