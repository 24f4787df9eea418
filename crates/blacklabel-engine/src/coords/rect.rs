use super::{Vec2, Viewport};

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
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

    /// Rect covering a viewport from the origin.
    #[inline]
    pub const fn from_viewport(v: Viewport) -> Self {
        Self::new(0.0, 0.0, v.width, v.height)
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// The rect's size as a viewport (may be invalid for empty rects).
    #[inline]
    pub fn viewport(self) -> Viewport {
        Viewport::new(self.size.x, self.size.y)
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut w = self.size.x;
        let mut h = self.size.y;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Rect::new(x, y, w, h)
    }

    /// Shrinks the rect by `dx` horizontally and `dy` vertically on each side.
    /// Never produces a negative size.
    #[inline]
    pub fn inset(self, dx: f32, dy: f32) -> Self {
        Rect::new(
            self.origin.x + dx,
            self.origin.y + dy,
            (self.size.x - 2.0 * dx).max(0.0),
            (self.size.y - 2.0 * dy).max(0.0),
        )
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let x0 = a.origin.x.max(b.origin.x);
        let y0 = a.origin.y.max(b.origin.y);
        let x1 = (a.origin.x + a.size.x).min(b.origin.x + b.size.x);
        let y1 = (a.origin.y + a.size.y).min(b.origin.y + b.size.y);

        let w = x1 - x0;
        let h = y1 - y0;

        if w <= 0.0 || h <= 0.0 {
            None
        } else {
            Some(Rect::new(x0, y0, w, h))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── normalized ────────────────────────────────────────────────────────

    #[test]
    fn normalized_flips_negative_extent() {
        let n = r(10.0, 10.0, -4.0, -3.0).normalized();
        assert_eq!(n, r(6.0, 7.0, 4.0, 3.0));
    }

    // ── inset ─────────────────────────────────────────────────────────────

    #[test]
    fn inset_shrinks_both_sides() {
        assert_eq!(r(0.0, 0.0, 100.0, 50.0).inset(10.0, 5.0), r(10.0, 5.0, 80.0, 40.0));
    }

    #[test]
    fn inset_never_goes_negative() {
        let i = r(0.0, 0.0, 10.0, 10.0).inset(20.0, 20.0);
        assert_eq!(i.size, Vec2::ZERO);
        assert!(i.is_empty());
    }

    // ── intersect ─────────────────────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        let b = r(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(b), Some(r(5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn intersect_touching_edge_returns_none() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        let b = r(10.0, 0.0, 10.0, 10.0);
        assert!(a.intersect(b).is_none());
    }

    // ── viewport conversions ──────────────────────────────────────────────

    #[test]
    fn viewport_round_trip_keeps_size() {
        let v = Viewport::new(1024.0, 768.0);
        let rect = Rect::from_viewport(v);
        assert_eq!(rect.origin, Vec2::ZERO);
        assert_eq!(rect.viewport(), v);
    }
}
