/// Viewport size in logical pixels.
///
/// Used both as the renderer coordinate basis and as the "measured size" of
/// host containers and rendering surfaces.
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
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width over height, or `None` when either side is zero, negative or
    /// non-finite.
    #[inline]
    pub fn aspect(self) -> Option<f32> {
        self.is_valid().then(|| self.width / self.height)
    }

    /// Scales the height by `ratio`, keeping the width.
    #[inline]
    pub fn with_height_ratio(self, ratio: f32) -> Self {
        Self::new(self.width, self.height * ratio)
    }

    /// Physical pixel extent for a given scale factor, each side at least zero.
    #[inline]
    pub fn to_physical(self, scale: f32) -> (u32, u32) {
        let w = (self.width * scale).max(0.0).round() as u32;
        let h = (self.height * scale).max(0.0).round() as u32;
        (w, h)
    }
}
