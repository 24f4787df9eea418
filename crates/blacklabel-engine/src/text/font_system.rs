use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use crate::coords::Vec2;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("font load error: {0}")]
pub struct FontLoadError(pub String);

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Owns the loaded fonts.
///
/// Fonts are immutable after loading. The system is handed to
/// `TextRenderer::render` each frame so new glyphs rasterize on demand.
#[derive(Default)]
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        if bytes.is_empty() {
            return Err(FontLoadError("empty font data".to_string()));
        }
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Bounding box of laid-out text in logical pixels.
    ///
    /// Unknown fonts and empty strings measure as zero width and one line
    /// (`size * 1.2`) of height.
    #[must_use]
    pub fn measure_text(&self, text: &str, id: FontId, size: f32, max_width: Option<f32>) -> Vec2 {
        let line = Vec2::new(0.0, size * 1.2);
        let Some(font) = self.get(id) else { return line };

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings { max_width, ..LayoutSettings::default() });
        layout.append(&[font], &TextStyle::new(text, size, 0));

        let glyphs = layout.glyphs();
        if glyphs.is_empty() {
            return line;
        }

        // Pen position after each glyph, not the bitmap edge, so the result can
        // be fed back as `max_width` without triggering a wrap.
        let w = glyphs
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, size);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);
        let h = glyphs.iter().map(|g| g.y + g.height as f32).fold(size, f32::max);
        Vec2::new(w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_font_measures_one_empty_line() {
        let fs = FontSystem::new();
        assert_eq!(fs.measure_text("Black Label", FontId(3), 20.0, None), Vec2::new(0.0, 24.0));
    }

    #[test]
    fn empty_bytes_are_rejected() {
        let mut fs = FontSystem::new();
        assert!(fs.load_font(&[]).is_err());
        assert!(fs.is_empty());
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let mut fs = FontSystem::new();
        assert!(fs.load_font(b"not a font").is_err());
        assert_eq!(fs.len(), 0);
    }
}
