use crate::coords::Vec2;
use crate::draw::{DrawCmd, DrawList, ZIndex};
use crate::paint::Color;
use crate::text::FontId;

/// A run of text anchored at its top-left corner, in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    pub font: FontId,
    pub size: f32,
    pub color: Color,
    pub origin: Vec2,
    /// Wrap width. `None` keeps the run on one line.
    pub max_width: Option<f32>,
}

impl TextCmd {
    /// Unwrapped run at the origin.
    pub fn new(text: impl Into<String>, font: FontId, size: f32, color: Color) -> Self {
        Self { text: text.into(), font, size, color, origin: Vec2::ZERO, max_width: None }
    }

    pub fn at(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn wrapped(mut self, max_width: Option<f32>) -> Self {
        self.max_width = max_width;
        self
    }
}

impl DrawList {
    pub fn push_text(&mut self, z: ZIndex, run: TextCmd) {
        self.push(z, DrawCmd::Text(run));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_anchor_and_wrap() {
        let run = TextCmd::new("Black Label", FontId(0), 64.0, Color::WHITE)
            .at(Vec2::new(48.0, 200.0))
            .wrapped(Some(560.0));
        assert_eq!(run.origin, Vec2::new(48.0, 200.0));
        assert_eq!(run.max_width, Some(560.0));

        let mut list = DrawList::new();
        list.push_text(ZIndex::COPY, run.clone());
        assert!(matches!(&list.items()[0].cmd, DrawCmd::Text(t) if *t == run));
    }
}
