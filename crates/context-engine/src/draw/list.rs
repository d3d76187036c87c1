use std::ops::Range;

use crate::render::Mesh;

use super::{DrawCmd, TextCmd};

/// Consecutive commands of one kind, drawn with a single pipeline bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Batch {
    /// Index range into the frame mesh.
    Mesh(Range<u32>),
    /// Range over the frame's text commands, counted in recording order.
    Text(Range<usize>),
}

/// Draw commands for one frame, in paint order.
///
/// All geometry shares one `Mesh`; commands reference index ranges in it.
/// Paint order is insertion order regardless of command kind.
#[derive(Debug, Default)]
pub struct DrawList {
    mesh: Mesh,
    cmds: Vec<DrawCmd>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops recorded commands. Keeps allocations for the next frame.
    pub fn clear(&mut self) {
        self.mesh.clear();
        self.cmds.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn cmds(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Appends geometry produced by `build`.
    ///
    /// Nothing is recorded when `build` emits no triangles. Geometry that
    /// directly follows other geometry extends the previous command.
    pub fn push_mesh(&mut self, build: impl FnOnce(&mut Mesh)) {
        let start = self.mesh.index_count();
        build(&mut self.mesh);
        let end = self.mesh.index_count();
        if end == start {
            return;
        }

        if let Some(DrawCmd::Mesh { indices }) = self.cmds.last_mut() {
            if indices.end == start {
                indices.end = end;
                return;
            }
        }
        self.cmds.push(DrawCmd::Mesh { indices: start..end });
    }

    pub fn push_text(&mut self, cmd: TextCmd) {
        if cmd.text.is_empty() {
            return;
        }
        self.cmds.push(DrawCmd::Text(cmd));
    }

    /// Text commands in recording order.
    pub fn texts(&self) -> impl Iterator<Item = &TextCmd> {
        self.cmds.iter().filter_map(|c| match c {
            DrawCmd::Text(t) => Some(t),
            DrawCmd::Mesh { .. } => None,
        })
    }

    /// Groups consecutive commands of the same kind.
    pub fn batches(&self) -> Vec<Batch> {
        let mut out: Vec<Batch> = Vec::new();
        let mut text_ordinal = 0usize;

        for cmd in &self.cmds {
            match cmd {
                DrawCmd::Mesh { indices } => match out.last_mut() {
                    Some(Batch::Mesh(r)) if r.end == indices.start => r.end = indices.end,
                    _ => out.push(Batch::Mesh(indices.clone())),
                },
                DrawCmd::Text(_) => {
                    match out.last_mut() {
                        Some(Batch::Text(r)) => r.end = text_ordinal + 1,
                        _ => out.push(Batch::Text(text_ordinal..text_ordinal + 1)),
                    }
                    text_ordinal += 1;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Rect, Vec2};
    use crate::paint::Color;
    use crate::text::FontId;

    fn text(s: &str) -> TextCmd {
        TextCmd {
            text: s.to_owned(),
            origin: Vec2::zero(),
            font: FontId(0),
            px_size: 16.0,
            color: Color::WHITE,
        }
    }

    fn rect(list: &mut DrawList) {
        list.push_mesh(|m| m.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE));
    }

    #[test]
    fn adjacent_geometry_merges() {
        let mut list = DrawList::new();
        rect(&mut list);
        rect(&mut list);
        assert_eq!(list.len(), 1);
        assert_eq!(list.cmds()[0], DrawCmd::Mesh { indices: 0..12 });
    }

    #[test]
    fn empty_geometry_is_not_recorded() {
        let mut list = DrawList::new();
        list.push_mesh(|m| m.fill_rect(Rect::new(0.0, 0.0, 0.0, 0.0), Color::WHITE));
        list.push_text(text(""));
        assert!(list.is_empty());
    }

    #[test]
    fn batches_preserve_cross_kind_order() {
        let mut list = DrawList::new();
        rect(&mut list);
        list.push_text(text("a"));
        list.push_text(text("b"));
        rect(&mut list);
        list.push_text(text("c"));

        assert_eq!(
            list.batches(),
            vec![
                Batch::Mesh(0..6),
                Batch::Text(0..2),
                Batch::Mesh(6..12),
                Batch::Text(2..3),
            ]
        );
        let texts: Vec<_> = list.texts().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut list = DrawList::new();
        rect(&mut list);
        list.push_text(text("a"));
        list.clear();
        assert!(list.is_empty());
        assert!(list.mesh().is_empty());
        assert!(list.batches().is_empty());
    }
}
