use crate::coords::Rect;
use crate::draw::{DrawCmd, DrawList, ZIndex};
use crate::paint::Color;

/// Solid rectangle payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub color: Color,
}

impl DrawList {
    /// Records a solid rectangle.
    #[inline]
    pub fn push_rect(&mut self, z: ZIndex, rect: Rect, color: Color) {
        self.push(z, DrawCmd::Rect(RectCmd { rect, color }));
    }

    /// Records a rectangle outline of `width` as four edge strips.
    pub fn push_outline(&mut self, z: ZIndex, rect: Rect, width: f32, color: Color) {
        let r = rect.normalized();
        let w = width.min(r.size.x * 0.5).min(r.size.y * 0.5).max(0.0);
        if w <= 0.0 {
            return;
        }
        let (x, y, rw, rh) = (r.origin.x, r.origin.y, r.size.x, r.size.y);
        self.push_rect(z, Rect::new(x, y, rw, w), color);
        self.push_rect(z, Rect::new(x, y + rh - w, rw, w), color);
        self.push_rect(z, Rect::new(x, y + w, w, rh - 2.0 * w), color);
        self.push_rect(z, Rect::new(x + rw - w, y + w, w, rh - 2.0 * w), color);
    }
}
