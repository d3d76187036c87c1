use super::Vec2;

/// Drawable area in logical px; the basis shaders use to map positions to NDC.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// At least 1x1, so a minimized window never divides by zero.
    #[inline]
    pub fn clamped(self) -> Self {
        Self::new(self.width.max(1.0), self.height.max(1.0))
    }

    /// Logical px to clip space; the same mapping the WGSL vertex stages apply.
    pub fn to_ndc(self, p: Vec2) -> Vec2 {
        let v = self.clamped();
        Vec2::new(p.x / v.width * 2.0 - 1.0, 1.0 - p.y / v.height * 2.0)
    }
}

impl From<Vec2> for Viewport {
    fn from(size: Vec2) -> Self {
        Self::new(size.x, size.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_clip_edges() {
        let v = Viewport::new(800.0, 600.0);
        assert_eq!(v.to_ndc(Vec2::zero()), Vec2::new(-1.0, 1.0));
        assert_eq!(v.to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
        assert_eq!(v.to_ndc(Vec2::new(400.0, 300.0)), Vec2::zero());
    }

    #[test]
    fn zero_size_is_clamped() {
        assert_eq!(Viewport::new(0.0, 0.0).clamped(), Viewport::new(1.0, 1.0));
        assert!(Viewport::new(0.0, 0.0).to_ndc(Vec2::new(1.0, 1.0)).is_finite());
        assert!(!Viewport::new(0.0, 600.0).is_valid());
        assert!(!Viewport::new(f32::INFINITY, 600.0).is_valid());
        assert!(Viewport::new(800.0, 600.0).is_valid());
    }
}
