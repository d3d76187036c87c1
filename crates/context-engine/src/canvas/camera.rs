use crate::coords::{Rect, Vec2};

/// World → screen transform: `(p - position) * zoom`.
///
/// When disabled, points pass through unchanged and lengths are not scaled.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    position: Vec2,
    zoom: f32,
    enabled: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            zoom: 1.0,
            enabled: true,
        }
    }
}

impl Camera {
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Rejects non-finite or non-positive zoom, keeping the previous value.
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        if !zoom.is_finite() || zoom <= 0.0 {
            return false;
        }
        self.zoom = zoom;
        true
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Length multiplier currently in effect.
    #[inline]
    pub fn scale(&self) -> f32 {
        if self.enabled { self.zoom } else { 1.0 }
    }

    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        if self.enabled {
            (p - self.position) * self.zoom
        } else {
            p
        }
    }

    /// Screen → world; inverse of [`transform_point`](Self::transform_point).
    #[inline]
    pub fn inverse_transform_point(&self, p: Vec2) -> Vec2 {
        if self.enabled {
            p / self.zoom + self.position
        } else {
            p
        }
    }

    #[inline]
    pub fn transform_rect(&self, r: Rect) -> Rect {
        Rect::from_origin_size(self.transform_point(r.origin), r.size * self.scale())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cam = Camera::default();
        assert_eq!(cam.position(), Vec2::zero());
        assert_eq!(cam.zoom(), 1.0);
        assert!(cam.is_enabled());
        assert_eq!(cam.transform_point(Vec2::new(3.0, 4.0)), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn transform_offsets_then_scales() {
        let mut cam = Camera::default();
        cam.set_position(Vec2::new(100.0, 50.0));
        cam.set_zoom(2.0);
        assert_eq!(cam.transform_point(Vec2::new(110.0, 60.0)), Vec2::new(20.0, 20.0));
        assert_eq!(
            cam.transform_rect(Rect::new(100.0, 50.0, 10.0, 5.0)),
            Rect::new(0.0, 0.0, 20.0, 10.0)
        );
    }

    #[test]
    fn disabled_camera_is_identity() {
        let mut cam = Camera::default();
        cam.set_position(Vec2::new(100.0, 50.0));
        cam.set_zoom(3.0);
        cam.set_enabled(false);
        assert_eq!(cam.transform_point(Vec2::new(1.0, 2.0)), Vec2::new(1.0, 2.0));
        assert_eq!(cam.scale(), 1.0);
        // Zoom is remembered for when the camera comes back.
        cam.set_enabled(true);
        assert_eq!(cam.scale(), 3.0);
    }

    #[test]
    fn invalid_zoom_is_rejected() {
        let mut cam = Camera::default();
        assert!(cam.set_zoom(1.5));
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(!cam.set_zoom(bad));
            assert_eq!(cam.zoom(), 1.5);
        }
    }

    #[test]
    fn inverse_round_trips() {
        let mut cam = Camera::default();
        cam.set_position(Vec2::new(-25.0, 40.0));
        cam.set_zoom(2.0);
        let world = Vec2::new(12.0, -7.0);
        assert_eq!(cam.inverse_transform_point(cam.transform_point(world)), world);
    }
}
