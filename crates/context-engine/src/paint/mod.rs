//! Paint model shared between the canvas and renderers.
//!
//! Colors are stored linear-in-surface-space with premultiplied alpha. The
//! surface is configured non-sRGB by default, so 8-bit inputs reach the screen
//! unchanged.

pub mod color;

pub use color::Color;
