use super::Vec2;

/// Axis-aligned rectangle: top-left `origin` plus `size`, logical px.
///
/// Width or height may be negative as passed in by callers; tessellation and
/// hit tests work on the [`normalized`](Rect::normalized) form.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::from_origin_size(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Smallest rect spanning both corners, in any order.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min = Vec2::new(a.x.min(b.x), a.y.min(b.y));
        let max = Vec2::new(a.x.max(b.x), a.y.max(b.y));
        Self::from_origin_size(min, max - min)
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Same area with non-negative width and height.
    #[inline]
    pub fn normalized(self) -> Self {
        Self::from_corners(self.min(), self.max())
    }

    /// Edges count as inside.
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        let (lo, hi) = (r.min(), r.max());
        (lo.x..=hi.x).contains(&p.x) && (lo.y..=hi.y).contains(&p.y)
    }

    /// Overlap of two rects; `None` when they only touch or are disjoint.
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let (a, b) = (self.normalized(), other.normalized());
        let lo = Vec2::new(a.origin.x.max(b.origin.x), a.origin.y.max(b.origin.y));
        let hi = Vec2::new(a.max().x.min(b.max().x), a.max().y.min(b.max().y));
        let r = Rect::from_origin_size(lo, hi - lo);
        (!r.is_empty()).then_some(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_extent_flips_origin() {
        let n = Rect::new(10.0, 10.0, -4.0, -3.0).normalized();
        assert_eq!(n, Rect::new(6.0, 7.0, 4.0, 3.0));
        assert_eq!(Rect::new(1.0, 2.0, 3.0, 4.0).normalized(), Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn corners_in_any_order() {
        let r = Rect::from_corners(Vec2::new(5.0, 1.0), Vec2::new(2.0, 4.0));
        assert_eq!(r, Rect::new(2.0, 1.0, 3.0, 3.0));
    }

    #[test]
    fn contains_is_inclusive_on_every_edge() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        for p in [(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (5.0, 5.0)] {
            assert!(r.contains(Vec2::from(p)), "{p:?}");
        }
        assert!(!r.contains(Vec2::new(-0.5, 5.0)));
        assert!(!r.contains(Vec2::new(5.0, 10.5)));
        assert!(Rect::new(10.0, 10.0, -10.0, -10.0).contains(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn center_and_max() {
        let player = Rect::new(400.0, 300.0, 50.0, 50.0);
        assert_eq!(player.center(), Vec2::new(425.0, 325.0));
        assert_eq!(player.max(), Vec2::new(450.0, 350.0));
    }

    #[test]
    fn intersect_overlap_and_touching() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            a.intersect(Rect::new(5.0, 5.0, 10.0, 10.0)),
            Some(Rect::new(5.0, 5.0, 5.0, 5.0))
        );
        assert_eq!(a.intersect(Rect::new(10.0, 0.0, 10.0, 10.0)), None);
        assert_eq!(a.intersect(Rect::new(20.0, 20.0, 1.0, 1.0)), None);
    }

    #[test]
    fn zero_or_nan_size_is_empty() {
        assert!(Rect::new(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(Rect::new(0.0, 0.0, f32::NAN, 5.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}
