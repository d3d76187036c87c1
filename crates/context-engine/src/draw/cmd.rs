use std::ops::Range;

use crate::coords::Vec2;
use crate::paint::Color;
use crate::text::FontId;

/// Text run in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    /// Top-left of the layout box, logical px.
    pub origin: Vec2,
    pub font: FontId,
    /// Final pixel size (font size × scale × zoom).
    pub px_size: f32,
    pub color: Color,
}

/// One recorded draw command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Triangles in `DrawList::mesh`, as a range of the index buffer.
    Mesh { indices: Range<u32> },
    Text(TextCmd),
}
