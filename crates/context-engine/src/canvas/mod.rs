//! Immediate-style drawing surface handed to `Scene::render`.
//!
//! Calls are recorded into a `DrawList` in call order and rendered at the
//! end of the frame. World-space input goes through the camera; turn the
//! camera off for screen-space overlays such as a HUD.

mod camera;

use std::collections::HashSet;
use std::path::Path;

use crate::coords::{Rect, Vec2};
use crate::draw::{DrawList, TextCmd};
use crate::paint::Color;
use crate::render::{HAIRLINE, Mesh};
use crate::text::{FontError, FontSystem};

pub use camera::Camera;

/// Filled shape or 1 px outline.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FillMode {
    #[default]
    Fill,
    Outline,
}

/// Recording canvas. Persists across frames; owns the camera and fonts.
pub struct Canvas {
    list: DrawList,
    clear_color: Color,
    camera: Camera,
    fonts: FontSystem,
    warned_fonts: HashSet<String>,
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            list: DrawList::new(),
            clear_color: Color::BLACK,
            camera: Camera::default(),
            fonts: FontSystem::new(),
            warned_fonts: HashSet::new(),
        }
    }

    /// Start of a frame: empty draw list, black background.
    pub(crate) fn begin_frame(&mut self) {
        self.clear(Color::BLACK);
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.list
    }

    pub fn fonts(&self) -> &FontSystem {
        &self.fonts
    }

    // ── background ────────────────────────────────────────────────────────

    /// Discards everything drawn so far this frame and sets the background.
    pub fn clear(&mut self, color: Color) {
        self.list.clear();
        self.clear_color = color;
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    // ── camera ────────────────────────────────────────────────────────────

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_camera_position(&mut self, position: Vec2) {
        self.camera.set_position(position);
    }

    pub fn set_camera_zoom(&mut self, zoom: f32) {
        if !self.camera.set_zoom(zoom) {
            log::warn!("ignoring camera zoom {zoom}; keeping {}", self.camera.zoom());
        }
    }

    pub fn enable_camera(&mut self, enabled: bool) {
        self.camera.set_enabled(enabled);
    }

    pub fn camera_position(&self) -> Vec2 {
        self.camera.position()
    }

    pub fn camera_zoom(&self) -> f32 {
        self.camera.zoom()
    }

    pub fn is_camera_enabled(&self) -> bool {
        self.camera.is_enabled()
    }

    pub fn transform_point(&self, x: f32, y: f32) -> Vec2 {
        self.camera.transform_point(Vec2::new(x, y))
    }

    /// Screen position back into world space under the current camera.
    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        self.camera.inverse_transform_point(p)
    }

    // ── shapes ────────────────────────────────────────────────────────────

    pub fn draw_rect(&mut self, rect: Rect, color: Color) {
        let r = self.camera.transform_rect(rect);
        self.list.push_mesh(|m| m.fill_rect(r, color));
    }

    /// 1 px outline inside the rectangle bounds.
    pub fn draw_rect_outline(&mut self, rect: Rect, color: Color) {
        let r = self.camera.transform_rect(rect);
        self.list.push_mesh(|m| m.stroke_rect(r, HAIRLINE, color));
    }

    /// Rectangle outline as four lines along its edges.
    pub fn draw_rect_lines(&mut self, rect: Rect, color: Color) {
        let r = self.camera.transform_rect(rect);
        if !r.is_finite() || r.normalized().is_empty() {
            return;
        }
        let (min, max) = (r.min(), r.max());
        let corners = [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)];
        self.list.push_mesh(|m| m.polyline(&corners, true, HAIRLINE, color));
    }

    pub fn draw_line(&mut self, a: Vec2, b: Vec2, color: Color) {
        let (a, b) = (self.camera.transform_point(a), self.camera.transform_point(b));
        self.list.push_mesh(|m| m.line(a, b, HAIRLINE, color));
    }

    pub fn draw_point(&mut self, p: Vec2, color: Color) {
        let p = self.camera.transform_point(p);
        self.list.push_mesh(|m| m.point(p, HAIRLINE, color));
    }

    pub fn draw_triangle(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, color: Color, mode: FillMode) {
        let pts = [p1, p2, p3].map(|p| self.camera.transform_point(p));
        self.list.push_mesh(|m| match mode {
            FillMode::Fill => m.fill_triangle(pts[0], pts[1], pts[2], color),
            FillMode::Outline => m.polyline(&pts, true, HAIRLINE, color),
        });
    }

    pub fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, mode: FillMode) {
        let c = self.camera.transform_point(center);
        let r = radius * self.camera.scale();
        self.list.push_mesh(|m| match mode {
            FillMode::Fill => m.fill_circle(c, r, color),
            FillMode::Outline => m.stroke_circle(c, r, HAIRLINE, color),
        });
    }

    /// Arc of 8 segments. Degrees, 0° on +X, clockwise on screen.
    pub fn draw_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start_deg: f32,
        end_deg: f32,
        color: Color,
    ) {
        let c = self.camera.transform_point(center);
        let r = radius * self.camera.scale();
        self.list.push_mesh(|m| m.arc(c, r, start_deg, end_deg, HAIRLINE, color));
    }

    /// Corner radius is clamped to half the shorter side.
    pub fn draw_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color, mode: FillMode) {
        let r = self.camera.transform_rect(rect);
        let rad = radius * self.camera.scale();
        self.list.push_mesh(|m| match mode {
            FillMode::Fill => m.fill_rounded_rect(r, rad, color),
            FillMode::Outline => m.stroke_rounded_rect(r, rad, HAIRLINE, color),
        });
    }

    pub fn draw_rounded_rect_lines(&mut self, rect: Rect, radius: f32, color: Color) {
        self.draw_rounded_rect(rect, radius, color, FillMode::Outline);
    }

    /// Appends raw screen-space geometry, bypassing the camera.
    pub fn draw_mesh(&mut self, build: impl FnOnce(&mut Mesh)) {
        self.list.push_mesh(build);
    }

    // ── text ──────────────────────────────────────────────────────────────

    /// Text in the default font. `scale` multiplies the font's loaded size.
    pub fn draw_text(&mut self, text: &str, pos: Vec2, color: Color, scale: f32) {
        self.push_text(text, pos, color, None, scale);
    }

    pub fn draw_text_with(
        &mut self,
        text: &str,
        pos: Vec2,
        color: Color,
        font_name: &str,
        scale: f32,
    ) {
        self.push_text(text, pos, color, Some(font_name), scale);
    }

    fn push_text(
        &mut self,
        text: &str,
        pos: Vec2,
        color: Color,
        font_name: Option<&str>,
        scale: f32,
    ) {
        if text.is_empty() {
            return;
        }
        let Some(font) = self.fonts.resolve(font_name) else {
            self.warn_missing_font(font_name);
            return;
        };

        let px_size = font.size * scale * self.camera.scale();
        if !px_size.is_finite() || px_size <= 0.0 {
            return;
        }

        self.list.push_text(TextCmd {
            text: text.to_owned(),
            origin: self.camera.transform_point(pos),
            font: font.id,
            px_size,
            color,
        });
    }

    fn warn_missing_font(&mut self, font_name: Option<&str>) {
        let key = font_name.unwrap_or("<default>");
        if self.warned_fonts.insert(key.to_owned()) {
            match font_name {
                Some(name) => log::warn!("font '{name}' is not loaded; text skipped"),
                None => log::warn!("no default font loaded; text skipped"),
            }
        }
    }

    /// Unzoomed size of `text` in the named (or default) font.
    pub fn measure_text(&self, text: &str, font_name: Option<&str>, scale: f32) -> Option<Vec2> {
        let font = self.fonts.resolve(font_name)?;
        Some(self.fonts.measure(text, font.id, font.size * scale))
    }

    // ── fonts ─────────────────────────────────────────────────────────────

    /// Loads a font file under `name`. The first font loaded becomes the default.
    pub fn load_font(
        &mut self,
        name: &str,
        path: impl AsRef<Path>,
        size: f32,
    ) -> Result<(), FontError> {
        self.fonts.load_font(name, path, size)?;
        self.warned_fonts.remove(name);
        Ok(())
    }

    pub fn load_font_bytes(
        &mut self,
        name: &str,
        bytes: &[u8],
        size: f32,
    ) -> Result<(), FontError> {
        self.fonts.load_font_bytes(name, bytes, size)?;
        self.warned_fonts.remove(name);
        Ok(())
    }

    pub fn has_font(&self, name: &str) -> bool {
        self.fonts.has_font(name)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}
