//! CPU tessellation of canvas primitives into coloured triangles.
//!
//! Positions are screen-space logical pixels (camera already applied).
//! Colours are premultiplied. Degenerate input (non-finite coordinates,
//! zero area, non-positive radius) produces no geometry.

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Vec2};
use crate::paint::Color;

/// Line and point thickness in logical pixels.
pub const HAIRLINE: f32 = 1.0;

/// Segments per arc, matching the corner quality of rounded outlines.
pub const ARC_SEGMENTS: u32 = 8;

const CIRCLE_MIN_SEGMENTS: u32 = 12;
const CIRCLE_MAX_SEGMENTS: u32 = 128;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x4  // color
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Indexed triangle list.
#[derive(Debug, Default, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    fn push_vertex(&mut self, p: Vec2, color: [f32; 4]) -> u32 {
        let i = self.vertices.len() as u32;
        self.vertices.push(Vertex { pos: [p.x, p.y], color });
        i
    }

    fn push_quad(&mut self, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
        let i0 = self.push_vertex(a, color);
        let i1 = self.push_vertex(b, color);
        let i2 = self.push_vertex(c, color);
        let i3 = self.push_vertex(d, color);
        self.indices.extend_from_slice(&[i0, i1, i2, i0, i2, i3]);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        if !rect.is_finite() {
            return;
        }
        let r = rect.normalized();
        if r.is_empty() {
            return;
        }
        let (min, max) = (r.min(), r.max());
        self.push_quad(
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
            color.to_array(),
        );
    }

    /// Outline drawn inside the rectangle bounds, `width` thick.
    pub fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) {
        if !rect.is_finite() {
            return;
        }
        let r = rect.normalized();
        if r.is_empty() {
            return;
        }
        // Thin rects collapse to a single fill.
        if r.size.x <= 2.0 * width || r.size.y <= 2.0 * width {
            self.fill_rect(r, color);
            return;
        }
        let (x, y, w, h) = (r.origin.x, r.origin.y, r.size.x, r.size.y);
        self.fill_rect(Rect::new(x, y, w, width), color);
        self.fill_rect(Rect::new(x, y + h - width, w, width), color);
        self.fill_rect(Rect::new(x, y + width, width, h - 2.0 * width), color);
        self.fill_rect(Rect::new(x + w - width, y + width, width, h - 2.0 * width), color);
    }

    /// Segment from `a` to `b` as a quad `width` thick, centred on the segment.
    pub fn line(&mut self, a: Vec2, b: Vec2, width: f32, color: Color) {
        if !a.is_finite() || !b.is_finite() || !(width > 0.0) {
            return;
        }
        let d = b - a;
        let len = d.length();
        if len <= f32::EPSILON {
            self.point(a, width, color);
            return;
        }
        let n = Vec2::new(-d.y / len, d.x / len) * (width * 0.5);
        self.push_quad(a + n, b + n, b - n, a - n, color.to_array());
    }

    /// Square of side `size` with its top-left corner at `p`.
    pub fn point(&mut self, p: Vec2, size: f32, color: Color) {
        self.fill_rect(Rect::from_origin_size(p, Vec2::new(size, size)), color);
    }

    pub fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        if !a.is_finite() || !b.is_finite() || !c.is_finite() {
            return;
        }
        let area2 = (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y);
        if area2.abs() <= f32::EPSILON {
            return;
        }
        let col = color.to_array();
        let i0 = self.push_vertex(a, col);
        let i1 = self.push_vertex(b, col);
        let i2 = self.push_vertex(c, col);
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    /// Connected segments through `points`; `closed` joins the last point to the first.
    pub fn polyline(&mut self, points: &[Vec2], closed: bool, width: f32, color: Color) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], width, color);
        }
        if closed && points.len() > 2 {
            self.line(points[points.len() - 1], points[0], width, color);
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if !center.is_finite() || !(radius > 0.0) || !radius.is_finite() {
            return;
        }
        let segments = circle_segments(radius);
        let col = color.to_array();
        let c = self.push_vertex(center, col);
        let first = self.vertices.len() as u32;
        for i in 0..segments {
            let p = center + polar(radius, i as f32 / segments as f32 * std::f32::consts::TAU);
            self.push_vertex(p, col);
        }
        for i in 0..segments {
            let a = first + i;
            let b = first + (i + 1) % segments;
            self.indices.extend_from_slice(&[c, a, b]);
        }
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        if !center.is_finite() || !(radius > 0.0) || !radius.is_finite() {
            return;
        }
        let segments = circle_segments(radius);
        let points: Vec<Vec2> = (0..segments)
            .map(|i| center + polar(radius, i as f32 / segments as f32 * std::f32::consts::TAU))
            .collect();
        self.polyline(&points, true, width, color);
    }

    /// Arc of `ARC_SEGMENTS` line segments. Angles in degrees, 0° on +X,
    /// increasing clockwise on screen (+Y down).
    pub fn arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start_deg: f32,
        end_deg: f32,
        width: f32,
        color: Color,
    ) {
        if !center.is_finite() || !(radius > 0.0) || !radius.is_finite() {
            return;
        }
        if !start_deg.is_finite() || !end_deg.is_finite() {
            return;
        }
        let step = (end_deg - start_deg) / ARC_SEGMENTS as f32;
        let points: Vec<Vec2> = (0..=ARC_SEGMENTS)
            .map(|i| center + polar(radius, (start_deg + step * i as f32).to_radians()))
            .collect();
        self.polyline(&points, false, width, color);
    }

    /// Filled rounded rectangle: three bands plus four corner discs.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        if !rect.is_finite() || !radius.is_finite() {
            return;
        }
        let r = rect.normalized();
        if r.is_empty() {
            return;
        }
        let rad = clamp_corner_radius(r, radius);
        if rad <= 0.0 {
            self.fill_rect(r, color);
            return;
        }
        let (x, y, w, h) = (r.origin.x, r.origin.y, r.size.x, r.size.y);
        self.fill_rect(Rect::new(x + rad, y, w - 2.0 * rad, h), color);
        self.fill_rect(Rect::new(x, y + rad, rad, h - 2.0 * rad), color);
        self.fill_rect(Rect::new(x + w - rad, y + rad, rad, h - 2.0 * rad), color);
        for c in corner_centers(r, rad) {
            self.fill_circle(c, rad, color);
        }
    }

    /// Rounded outline: four straight edges plus four corner arcs.
    pub fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, width: f32, color: Color) {
        if !rect.is_finite() || !radius.is_finite() {
            return;
        }
        let r = rect.normalized();
        if r.is_empty() {
            return;
        }
        let rad = clamp_corner_radius(r, radius);
        let (x, y, w, h) = (r.origin.x, r.origin.y, r.size.x, r.size.y);

        self.line(Vec2::new(x + rad, y), Vec2::new(x + w - rad, y), width, color);
        self.line(Vec2::new(x + rad, y + h), Vec2::new(x + w - rad, y + h), width, color);
        self.line(Vec2::new(x, y + rad), Vec2::new(x, y + h - rad), width, color);
        self.line(Vec2::new(x + w, y + rad), Vec2::new(x + w, y + h - rad), width, color);

        if rad <= 0.0 {
            return;
        }
        let [tl, tr, bl, br] = corner_centers(r, rad);
        self.arc(tl, rad, 180.0, 270.0, width, color);
        self.arc(tr, rad, 270.0, 360.0, width, color);
        self.arc(bl, rad, 90.0, 180.0, width, color);
        self.arc(br, rad, 0.0, 90.0, width, color);
    }
}

/// Corner radius limited to `[0, min(w, h) / 2]`.
pub fn clamp_corner_radius(rect: Rect, radius: f32) -> f32 {
    let r = rect.normalized();
    radius.clamp(0.0, r.size.x.min(r.size.y) * 0.5)
}

fn corner_centers(r: Rect, rad: f32) -> [Vec2; 4] {
    let (x, y, w, h) = (r.origin.x, r.origin.y, r.size.x, r.size.y);
    [
        Vec2::new(x + rad, y + rad),
        Vec2::new(x + w - rad, y + rad),
        Vec2::new(x + rad, y + h - rad),
        Vec2::new(x + w - rad, y + h - rad),
    ]
}

fn circle_segments(radius: f32) -> u32 {
    // ~4 px per segment on the circumference.
    let by_size = (std::f32::consts::TAU * radius / 4.0).ceil() as u32;
    by_size.clamp(CIRCLE_MIN_SEGMENTS, CIRCLE_MAX_SEGMENTS)
}

#[inline]
fn polar(radius: f32, angle: f32) -> Vec2 {
    Vec2::new(angle.cos() * radius, angle.sin() * radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn bounds(mesh: &Mesh) -> (Vec2, Vec2) {
        let mut min = Vec2::new(f32::MAX, f32::MAX);
        let mut max = Vec2::new(f32::MIN, f32::MIN);
        for v in &mesh.vertices {
            min.x = min.x.min(v.pos[0]);
            min.y = min.y.min(v.pos[1]);
            max.x = max.x.max(v.pos[0]);
            max.y = max.y.max(v.pos[1]);
        }
        (min, max)
    }

    #[test]
    fn rect_is_two_triangles() {
        let mut mesh = Mesh::new();
        mesh.fill_rect(Rect::new(10.0, 20.0, 30.0, 40.0), Color::WHITE);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert_eq!(bounds(&mesh), (Vec2::new(10.0, 20.0), Vec2::new(40.0, 60.0)));
    }

    #[test]
    fn negative_size_rect_is_normalized() {
        let mut mesh = Mesh::new();
        mesh.fill_rect(Rect::new(40.0, 60.0, -30.0, -40.0), Color::WHITE);
        assert_eq!(bounds(&mesh), (Vec2::new(10.0, 20.0), Vec2::new(40.0, 60.0)));
    }

    #[test]
    fn degenerate_input_is_skipped() {
        let mut mesh = Mesh::new();
        mesh.fill_rect(Rect::new(0.0, 0.0, 0.0, 10.0), Color::WHITE);
        mesh.fill_rect(Rect::new(f32::NAN, 0.0, 5.0, 5.0), Color::WHITE);
        mesh.fill_circle(Vec2::new(5.0, 5.0), 0.0, Color::WHITE);
        mesh.fill_circle(Vec2::new(5.0, 5.0), -2.0, Color::WHITE);
        mesh.fill_triangle(Vec2::zero(), Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0), Color::WHITE);
        mesh.arc(Vec2::zero(), 0.0, 0.0, 90.0, HAIRLINE, Color::WHITE);
        assert!(mesh.is_empty());
    }

    #[test]
    fn triangle_keeps_its_corners() {
        let mut mesh = Mesh::new();
        mesh.fill_triangle(
            Vec2::new(0.0, 10.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(10.0, 10.0),
            Color::WHITE,
        );
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[1].pos, [5.0, 0.0]);
    }

    #[test]
    fn circle_fan_stays_within_radius() {
        let mut mesh = Mesh::new();
        let center = Vec2::new(100.0, 100.0);
        mesh.fill_circle(center, 10.0, Color::WHITE);

        let segments = circle_segments(10.0);
        assert_eq!(mesh.vertices.len() as u32, segments + 1);
        assert_eq!(mesh.indices.len() as u32, segments * 3);
        for v in &mesh.vertices {
            let d = Vec2::new(v.pos[0], v.pos[1]) - center;
            assert!(d.length() <= 10.0 + 1e-3);
        }
    }

    #[test]
    fn circle_segment_count_is_bounded() {
        assert_eq!(circle_segments(0.5), CIRCLE_MIN_SEGMENTS);
        assert_eq!(circle_segments(10_000.0), CIRCLE_MAX_SEGMENTS);
        assert!(circle_segments(40.0) > circle_segments(10.0));
    }

    #[test]
    fn arc_has_eight_segments() {
        let mut mesh = Mesh::new();
        mesh.arc(Vec2::zero(), 10.0, 0.0, 90.0, HAIRLINE, Color::WHITE);
        assert_eq!(mesh.indices.len() as u32, ARC_SEGMENTS * 6);
    }

    #[test]
    fn arc_quadrant_follows_screen_axes() {
        // 0..90 degrees sweeps from +X to +Y (down on screen).
        let mut mesh = Mesh::new();
        mesh.arc(Vec2::zero(), 10.0, 0.0, 90.0, HAIRLINE, Color::WHITE);
        let (min, max) = bounds(&mesh);
        assert!(min.x > -1.0 && min.y > -1.0);
        assert!(max.x < 11.0 && max.y > 9.0);
    }

    #[test]
    fn line_is_a_centred_quad() {
        let mut mesh = Mesh::new();
        mesh.line(Vec2::new(0.0, 5.0), Vec2::new(10.0, 5.0), 2.0, Color::WHITE);
        assert_eq!(mesh.vertices.len(), 4);
        let (min, max) = bounds(&mesh);
        assert!(approx(min.y, 4.0) && approx(max.y, 6.0));
        assert!(approx(min.x, 0.0) && approx(max.x, 10.0));
    }

    #[test]
    fn zero_length_line_becomes_point() {
        let mut mesh = Mesh::new();
        mesh.line(Vec2::new(3.0, 3.0), Vec2::new(3.0, 3.0), HAIRLINE, Color::WHITE);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(bounds(&mesh), (Vec2::new(3.0, 3.0), Vec2::new(4.0, 4.0)));
    }

    #[test]
    fn corner_radius_is_clamped_to_half_the_short_side() {
        let r = Rect::new(0.0, 0.0, 80.0, 20.0);
        assert_eq!(clamp_corner_radius(r, 50.0), 10.0);
        assert_eq!(clamp_corner_radius(r, -5.0), 0.0);
        assert_eq!(clamp_corner_radius(r, 4.0), 4.0);
    }

    #[test]
    fn rounded_rect_stays_inside_bounds() {
        let mut mesh = Mesh::new();
        mesh.fill_rounded_rect(Rect::new(10.0, 10.0, 80.0, 80.0), 500.0, Color::WHITE);
        let (min, max) = bounds(&mesh);
        assert!(min.x >= 10.0 - 1e-3 && min.y >= 10.0 - 1e-3);
        assert!(max.x <= 90.0 + 1e-3 && max.y <= 90.0 + 1e-3);
    }

    #[test]
    fn rounded_rect_without_radius_is_plain_rect() {
        let mut mesh = Mesh::new();
        mesh.fill_rounded_rect(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, Color::WHITE);
        assert_eq!(mesh.vertices.len(), 4);
    }

    #[test]
    fn rounded_outline_has_edges_and_arcs() {
        let mut mesh = Mesh::new();
        mesh.stroke_rounded_rect(Rect::new(0.0, 0.0, 100.0, 50.0), 10.0, HAIRLINE, Color::WHITE);
        // 4 edges + 4 arcs of ARC_SEGMENTS quads.
        assert_eq!(mesh.indices.len() as u32, (4 + 4 * ARC_SEGMENTS) * 6);
    }

    #[test]
    fn stroke_rect_is_four_bands() {
        let mut mesh = Mesh::new();
        mesh.stroke_rect(Rect::new(0.0, 0.0, 20.0, 20.0), HAIRLINE, Color::WHITE);
        assert_eq!(mesh.indices.len(), 24);
        assert_eq!(bounds(&mesh), (Vec2::zero(), Vec2::new(20.0, 20.0)));
    }

    #[test]
    fn colors_are_premultiplied() {
        let mut mesh = Mesh::new();
        mesh.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::rgba(255, 0, 0, 128));
        let c = mesh.vertices[0].color;
        assert!(approx(c[0], c[3]));
    }
}
