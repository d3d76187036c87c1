use std::ops::Range;

use crate::draw::{Batch, DrawList};
use crate::paint::Color;
use crate::text::FontSystem;

use super::common::clear_color;
use super::geometry::GeometryRenderer;
use super::text::TextRenderer;
use super::{RenderCtx, RenderTarget};

/// Renders a `DrawList` in paint order within one render pass.
///
/// All geometry and glyph data are uploaded before the pass begins; the pass
/// then walks the batches in order and switches pipelines between kinds.
#[derive(Default)]
pub struct FrameRenderer {
    geometry: GeometryRenderer,
    text: TextRenderer,
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        list: &DrawList,
        fonts: &FontSystem,
        clear: Color,
    ) {
        let batches = list.batches();
        log::trace!("frame: {} commands in {} batches", list.len(), batches.len());

        let has_geometry = self.geometry.prepare(ctx, list.mesh());
        let text_ranges = if batches.iter().any(|b| matches!(b, Batch::Text(_))) {
            self.text.prepare(ctx, list.texts(), fonts)
        } else {
            Vec::new()
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("context frame pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color(clear)),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for batch in batches {
            match batch {
                Batch::Mesh(indices) => {
                    if has_geometry {
                        self.geometry.draw(&mut rpass, indices);
                    }
                }
                Batch::Text(cmds) => {
                    if let Some(instances) = instance_span(&text_ranges, cmds) {
                        self.text.draw(&mut rpass, instances);
                    }
                }
            }
        }
    }
}

/// Instance range covering text commands `cmds`, given each command's own range.
///
/// Per-command ranges are contiguous and ascending, so a run of commands maps
/// to one range from the first start to the last end.
fn instance_span(ranges: &[Range<u32>], cmds: Range<usize>) -> Option<Range<u32>> {
    if cmds.is_empty() {
        return None;
    }
    let first = ranges.get(cmds.start)?;
    let last = ranges.get(cmds.end - 1)?;
    let span = first.start..last.end;
    (!span.is_empty()).then_some(span)
}
