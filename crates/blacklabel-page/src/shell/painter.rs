use blacklabel_engine::coords::Rect;
use blacklabel_engine::draw::shapes::text::TextCmd;
use blacklabel_engine::draw::{DrawList, ZIndex};
use blacklabel_engine::paint::Color;
use blacklabel_engine::text::FontId;

use super::{CtaStyle, PageLayout, PageShell, TextBlock};

const HAIRLINE: f32 = 1.0;

/// Records the page chrome and copy into `list`.
///
/// Without a font only the shapes are drawn. The backdrop container itself is
/// left empty for the 3D surface; a scrim behind the copy keeps it readable
/// over the animation.
pub fn paint_page(list: &mut DrawList, shell: &PageShell, layout: &PageLayout, font: Option<FontId>) {
    let theme = &shell.theme;

    if let Some(backdrop) = layout.backdrop {
        let scrim = Rect::new(
            backdrop.origin.x,
            backdrop.origin.y,
            backdrop.size.x * 0.55,
            backdrop.size.y,
        );
        list.push_rect(ZIndex::BACKDROP, scrim, theme.background.with_alpha(0.45));
    }

    list.push_rect(ZIndex::CHROME, layout.nav, theme.chrome);
    let rule = Rect::new(0.0, layout.nav.max().y - HAIRLINE, layout.nav.size.x, HAIRLINE);
    list.push_rect(ZIndex::CHROME, rule, theme.outline.with_alpha(0.4));

    for (cta, button) in shell.actions.iter().zip(&layout.buttons) {
        match cta.style {
            CtaStyle::Primary => list.push_rect(ZIndex::CHROME, button.rect, theme.accent),
            CtaStyle::Ghost => list.push_outline(ZIndex::CHROME, button.rect, HAIRLINE, theme.outline),
        }
    }

    let Some(font) = font else {
        return;
    };
    let mut text = |s: &str, block: &TextBlock, color: Color| {
        let run = TextCmd::new(s, font, block.font_size, color)
            .at(block.rect.origin)
            .wrapped(block.max_width);
        list.push_text(ZIndex::COPY, run);
    };

    text(&shell.brand, &layout.brand, theme.ink);
    for (link, block) in shell.links.iter().zip(&layout.links) {
        text(&link.label, block, theme.muted);
    }

    let copy = &shell.hero;
    if let (Some(s), Some(b)) = (&copy.eyebrow, &layout.eyebrow) {
        text(s, b, theme.muted);
    }
    text(&copy.title, &layout.title, theme.ink);
    if let (Some(s), Some(b)) = (&copy.subtitle, &layout.subtitle) {
        text(s, b, theme.muted);
    }
    for (cta, button) in shell.actions.iter().zip(&layout.buttons) {
        let color = match cta.style {
            CtaStyle::Primary => theme.background,
            CtaStyle::Ghost => theme.ink,
        };
        text(&cta.label, &button.label, color);
    }
    if let (Some(s), Some(b)) = (&copy.meta, &layout.meta) {
        text(s, b, theme.muted);
    }
}
