use std::collections::HashMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};
use wgpu::util::DeviceExt;

use crate::draw::TextCmd;
use crate::text::FontSystem;

use super::common::{
    grow_capacity, premul_alpha_blend, triangle_list, viewport_ubo_entry, QuadVertex,
    ViewportUniform, QUAD_INDICES, QUAD_VERTICES,
};
use super::RenderCtx;

const ATLAS_SIZE: u32 = 2048;
const GLYPH_PADDING: u32 = 1;

/// Shelf packer over the square glyph atlas.
#[derive(Debug)]
struct ShelfPacker {
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl Default for ShelfPacker {
    fn default() -> Self {
        Self {
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
            full: false,
        }
    }
}

impl ShelfPacker {
    /// Reserves a `w`×`h` slot and returns its top-left, or `None` once full.
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        // A glyph bigger than the whole atlas can never fit; skip it without
        // marking the atlas full.
        if self.full
            || w + 2 * GLYPH_PADDING > ATLAS_SIZE
            || h + 2 * GLYPH_PADDING > ATLAS_SIZE
        {
            return None;
        }
        if self.cursor_x + w + GLYPH_PADDING > ATLAS_SIZE {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }
        if self.cursor_y + h + GLYPH_PADDING > ATLAS_SIZE {
            self.full = true;
            return None;
        }
        let slot = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(slot)
    }
}

/// Atlas UV rectangle of a rasterized glyph.
#[derive(Debug, Copy, Clone)]
struct AtlasSlot {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

impl AtlasSlot {
    fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        let s = ATLAS_SIZE as f32;
        Self {
            uv_min: [x as f32 / s, y as f32 / s],
            uv_max: [(x + w) as f32 / s, (y + h) as f32 / s],
        }
    }
}

/// CPU bookkeeping for the atlas texture: where each glyph lives.
#[derive(Default)]
struct GlyphAtlas {
    packer: ShelfPacker,
    slots: HashMap<GlyphRasterConfig, AtlasSlot>,
    warned_full: bool,
}

impl GlyphAtlas {
    fn reset(&mut self) {
        self.packer = ShelfPacker::default();
        self.slots.clear();
    }
}

/// Device objects for text, rebuilt together when the surface format changes.
struct TextGpu {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    viewport_ubo: wgpu::Buffer,
    atlas: wgpu::Texture,
    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
}

impl TextGpu {
    fn new(ctx: &RenderCtx<'_>) -> Self {
        let device = ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("context text shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/text.wgsl").into()),
        });

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("context text bgl"),
            entries: &[
                viewport_ubo_entry(0),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("context text pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("context text pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), GlyphInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: triangle_list(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let atlas = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("context glyph atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let atlas_view = atlas.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("context glyph sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let viewport_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("context text viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("context text bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: viewport_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("context text quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("context text quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!("text pipeline built for {:?}", ctx.surface_format);
        Self {
            format: ctx.surface_format,
            pipeline,
            bind_group,
            viewport_ubo,
            atlas,
            quad_vbo,
            quad_ibo,
        }
    }

    fn write_glyph(&self, ctx: &RenderCtx<'_>, bitmap: &[u8], x: u32, y: u32, w: u32, h: u32) {
        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.atlas,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );
    }
}

/// Growable instance buffer; contents are rewritten every frame.
#[derive(Default)]
struct InstanceBuffer {
    buffer: Option<wgpu::Buffer>,
    capacity: usize,
}

impl InstanceBuffer {
    fn upload(&mut self, ctx: &RenderCtx<'_>, instances: &[GlyphInstance]) {
        if self.buffer.is_none() || instances.len() > self.capacity {
            self.capacity = grow_capacity(instances.len());
            self.buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("context text instance vbo"),
                size: (self.capacity * std::mem::size_of::<GlyphInstance>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }
        if let Some(buffer) = &self.buffer {
            ctx.queue.write_buffer(buffer, 0, bytemuck::cast_slice(instances));
        }
    }
}

/// Draws `TextCmd`s from a 2048×2048 R8 glyph atlas.
///
/// Glyphs are rasterized by fontdue on first use and cached by
/// `GlyphRasterConfig` (font, glyph, pixel size). When the atlas runs out of
/// room the remaining glyphs of that frame are dropped and the atlas is
/// emptied at the start of the next `prepare`.
pub struct TextRenderer {
    gpu: Option<TextGpu>,
    atlas: GlyphAtlas,
    instances: InstanceBuffer,
    layout: Layout<()>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            gpu: None,
            atlas: GlyphAtlas::default(),
            instances: InstanceBuffer::default(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lays out and uploads every text command of the frame.
    ///
    /// Returns one instance range per command, in input order. Commands whose
    /// font is unknown get an empty range.
    pub fn prepare<'a>(
        &mut self,
        ctx: &RenderCtx<'_>,
        texts: impl Iterator<Item = &'a TextCmd>,
        fonts: &FontSystem,
    ) -> Vec<Range<u32>> {
        if self.gpu.as_ref().is_none_or(|g| g.format != ctx.surface_format) {
            // A new atlas texture starts empty.
            self.gpu = Some(TextGpu::new(ctx));
            self.atlas.reset();
        }
        if self.atlas.packer.full {
            log::debug!("glyph atlas reset ({} glyphs evicted)", self.atlas.slots.len());
            self.atlas.reset();
        }

        let scale = ctx.scale_factor.max(0.01);
        let mut instances = Vec::new();
        let ranges: Vec<Range<u32>> = texts
            .map(|cmd| {
                let start = instances.len() as u32;
                self.layout_cmd(ctx, cmd, fonts, scale, &mut instances);
                start..instances.len() as u32
            })
            .collect();

        if instances.is_empty() {
            return ranges;
        }
        if let Some(gpu) = &self.gpu {
            let uniform = ViewportUniform::from_ctx(ctx);
            ctx.queue.write_buffer(&gpu.viewport_ubo, 0, bytemuck::bytes_of(&uniform));
        }
        self.instances.upload(ctx, &instances);
        ranges
    }

    /// Draws glyph `instances` uploaded by the last `prepare`.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, instances: Range<u32>) {
        if instances.is_empty() {
            return;
        }
        let (Some(gpu), Some(instance_vbo)) = (&self.gpu, &self.instances.buffer) else {
            return;
        };

        rpass.set_pipeline(&gpu.pipeline);
        rpass.set_bind_group(0, &gpu.bind_group, &[]);
        rpass.set_vertex_buffer(0, gpu.quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(gpu.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, instances);
    }

    fn layout_cmd(
        &mut self,
        ctx: &RenderCtx<'_>,
        cmd: &TextCmd,
        fonts: &FontSystem,
        scale: f32,
        out: &mut Vec<GlyphInstance>,
    ) {
        let Some(font) = fonts.get(cmd.font) else {
            log::warn!("text draw with unknown {:?} skipped", cmd.font);
            return;
        };
        if !cmd.origin.is_finite() || !(cmd.px_size > 0.0) || !cmd.px_size.is_finite() {
            return;
        }

        // Quarter-pixel size steps keep the cache small while zoom animates.
        let phys_size = ((cmd.px_size * scale) * 4.0).round() / 4.0;
        if phys_size <= 0.0 {
            return;
        }

        self.layout.reset(&LayoutSettings {
            x: (cmd.origin.x * scale).round(),
            y: (cmd.origin.y * scale).round(),
            ..LayoutSettings::default()
        });
        self.layout.append(&[font], &TextStyle::new(&cmd.text, phys_size, 0));

        let color = cmd.color.to_array();
        for g in self.layout.glyphs() {
            if !g.char_data.rasterize() || g.width == 0 || g.height == 0 {
                continue;
            }
            let Some(slot) = glyph_slot(&mut self.atlas, self.gpu.as_ref(), ctx, font, g.key) else {
                continue;
            };
            let (x, y) = (g.x, g.y);
            out.push(GlyphInstance {
                dst_min: [x / scale, y / scale],
                dst_max: [(x + g.width as f32) / scale, (y + g.height as f32) / scale],
                uv_min: slot.uv_min,
                uv_max: slot.uv_max,
                color,
            });
        }
    }
}

/// Cached slot for `key`, rasterizing and uploading it on first use.
fn glyph_slot(
    atlas: &mut GlyphAtlas,
    gpu: Option<&TextGpu>,
    ctx: &RenderCtx<'_>,
    font: &fontdue::Font,
    key: GlyphRasterConfig,
) -> Option<AtlasSlot> {
    if let Some(slot) = atlas.slots.get(&key) {
        return Some(*slot);
    }
    let gpu = gpu?;

    let (metrics, bitmap) = font.rasterize_config(key);
    let (w, h) = (metrics.width as u32, metrics.height as u32);
    if w == 0 || h == 0 {
        return None;
    }

    let Some((x, y)) = atlas.packer.place(w, h) else {
        if !atlas.warned_full {
            log::warn!(
                "glyph atlas full ({ATLAS_SIZE}x{ATLAS_SIZE}); \
                 glyphs dropped this frame, atlas resets next frame"
            );
            atlas.warned_full = true;
        }
        return None;
    };

    gpu.write_glyph(ctx, &bitmap, x, y, w, h);
    let slot = AtlasSlot::new(x, y, w, h);
    atlas.slots.insert(key, slot);
    Some(slot)
}

/// Per-glyph instance (48 bytes).
///
///  offset  0  dst_min  [f32; 2]   loc 1
///  offset  8  dst_max  [f32; 2]   loc 2
///  offset 16  uv_min   [f32; 2]   loc 3
///  offset 24  uv_max   [f32; 2]   loc 4
///  offset 32  color    [f32; 4]   loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2, // dst_max
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packer_fills_rows_left_to_right() {
        let mut p = ShelfPacker::default();
        assert_eq!(p.place(10, 20), Some((1, 1)));
        assert_eq!(p.place(10, 5), Some((12, 1)));
    }

    #[test]
    fn packer_starts_a_new_shelf_when_row_is_full() {
        let mut p = ShelfPacker::default();
        p.place(ATLAS_SIZE - 20, 30).unwrap();
        // Does not fit in the remaining 20 px; goes below the 30 px row.
        assert_eq!(p.place(30, 10), Some((1, 32)));
    }

    #[test]
    fn packer_reports_full_and_stays_full() {
        let mut p = ShelfPacker::default();
        assert_eq!(p.place(ATLAS_SIZE - 2, ATLAS_SIZE - 2), Some((1, 1)));
        assert!(p.place(1, 1).is_none());
        assert!(p.full);
        assert!(p.place(1, 1).is_none());
    }

    #[test]
    fn atlas_slot_uvs_are_normalized() {
        let slot = AtlasSlot::new(0, 0, ATLAS_SIZE / 2, ATLAS_SIZE);
        assert_eq!(slot.uv_min, [0.0, 0.0]);
        assert_eq!(slot.uv_max, [0.5, 1.0]);
    }

    #[test]
    fn atlas_reset_clears_packer_and_slots() {
        let mut atlas = GlyphAtlas::default();
        atlas.packer.place(ATLAS_SIZE - 2, ATLAS_SIZE - 2);
        atlas.packer.place(1, 1);
        assert!(atlas.packer.full);
        atlas.reset();
        assert!(!atlas.packer.full);
        assert!(atlas.slots.is_empty());
        assert_eq!(atlas.packer.place(4, 4), Some((1, 1)));
    }

    #[test]
    fn oversized_glyph_is_rejected_without_filling() {
        let mut p = ShelfPacker::default();
        assert!(p.place(ATLAS_SIZE, 4).is_none());
        assert!(!p.full);
    }

    #[test]
    fn glyph_taller_than_atlas_leaves_room_for_others() {
        let mut p = ShelfPacker::default();
        assert!(p.place(4, 4).is_some());
        assert!(p.place(10, ATLAS_SIZE).is_none());
        assert!(!p.full);
        assert!(p.place(4, 4).is_some());
    }
}
