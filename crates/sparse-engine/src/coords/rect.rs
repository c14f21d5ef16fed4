use bytemuck::{Pod, Zeroable};

use super::Vec2;

/// Axis-aligned rectangle in render space (bottom-left origin).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Flips negative extents so width and height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let Rect { origin, size } = self;
        let (x, w) = if size.x < 0.0 { (origin.x + size.x, -size.x) } else { (origin.x, size.x) };
        let (y, h) = if size.y < 0.0 { (origin.y + size.y, -size.y) } else { (origin.y, size.y) };
        Rect::new(x, y, w, h)
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        let max = r.max();
        p.x >= r.origin.x && p.y >= r.origin.y && p.x < max.x && p.y < max.y
    }

    /// Intersection with `other`, or `None` when the overlap has no area.
    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let x0 = a.origin.x.max(b.origin.x);
        let y0 = a.origin.y.max(b.origin.y);
        let x1 = a.max().x.min(b.max().x);
        let y1 = a.max().y.min(b.max().y);

        let clipped = Rect::new(x0, y0, x1 - x0, y1 - y0);
        (!clipped.is_empty()).then_some(clipped)
    }
}
