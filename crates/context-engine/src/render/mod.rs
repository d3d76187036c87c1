//! GPU rendering.
//!
//! The canvas records a `DrawList`; `FrameRenderer` uploads its geometry and
//! glyphs and draws everything in recording order in a single pass.
//!
//! Conventions:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Shaders convert to NDC with a viewport uniform.
//! - Colours are premultiplied alpha.

mod common;
mod ctx;
mod frame;
mod geometry;
mod mesh;
mod text;

pub use ctx::{RenderCtx, RenderTarget};
pub use frame::FrameRenderer;
pub use geometry::GeometryRenderer;
pub use mesh::{clamp_corner_radius, Mesh, Vertex, ARC_SEGMENTS, HAIRLINE};
pub use text::TextRenderer;
