use blacklabel_engine::coords::{Rect, Vec2, Viewport};

use super::PageShell;

pub(crate) const NAV_HEIGHT: f32 = 72.0;
const GUTTER: f32 = 48.0;
const LINK_GAP: f32 = 32.0;
const COPY_MAX_WIDTH: f32 = 560.0;
const STACK_GAP: f32 = 16.0;
const BUTTON_HEIGHT: f32 = 48.0;
const BUTTON_PAD_X: f32 = 24.0;
const BUTTON_GAP: f32 = 16.0;

pub(crate) const BRAND_SIZE: f32 = 18.0;
pub(crate) const LINK_SIZE: f32 = 14.0;
pub(crate) const EYEBROW_SIZE: f32 = 13.0;
pub(crate) const SUBTITLE_SIZE: f32 = 18.0;
pub(crate) const META_SIZE: f32 = 13.0;
pub(crate) const BUTTON_SIZE: f32 = 15.0;

/// Title size scales with the viewport width.
pub(crate) fn title_size(viewport: Viewport) -> f32 {
    (viewport.width * 0.07).clamp(36.0, 72.0)
}

/// Rough metrics for when no font is loaded: a fixed advance per character
/// and no wrapping.
pub fn estimate_text(text: &str, size: f32, max_width: Option<f32>) -> Vec2 {
    let width = text.chars().count() as f32 * size * 0.55;
    match max_width {
        Some(max) if max > 0.0 && width > max => {
            let lines = (width / max).ceil();
            Vec2::new(max, lines * size * 1.2)
        }
        _ => Vec2::new(width, size * 1.2),
    }
}

/// A positioned text run.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextBlock {
    /// Measured box; the origin is where the text starts.
    pub rect: Rect,
    pub font_size: f32,
    pub max_width: Option<f32>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ButtonBox {
    pub rect: Rect,
    pub label: TextBlock,
}

/// Every rect the painter and the backdrop need for one viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub viewport: Viewport,
    pub nav: Rect,
    pub brand: TextBlock,
    /// One per nav link, in source order, right-aligned.
    pub links: Vec<TextBlock>,
    pub hero: Rect,
    /// Backdrop container; the hero itself when the page has a slot.
    pub backdrop: Option<Rect>,
    pub eyebrow: Option<TextBlock>,
    pub title: TextBlock,
    pub subtitle: Option<TextBlock>,
    pub buttons: Vec<ButtonBox>,
    pub meta: Option<TextBlock>,
}

impl PageLayout {
    /// `measure(text, size, max_width)` returns the laid-out size of a run.
    pub fn compute(
        shell: &PageShell,
        viewport: Viewport,
        measure: impl Fn(&str, f32, Option<f32>) -> Vec2,
    ) -> Self {
        let w = viewport.width.max(0.0);
        let h = viewport.height.max(0.0);

        let nav = Rect::new(0.0, 0.0, w, NAV_HEIGHT);
        let brand = centered_in_bar(measure(&shell.brand, BRAND_SIZE, None), BRAND_SIZE, GUTTER);

        let mut links = Vec::with_capacity(shell.links.len());
        let mut right = w - GUTTER;
        for link in shell.links.iter().rev() {
            let size = measure(&link.label, LINK_SIZE, None);
            let block = centered_in_bar(size, LINK_SIZE, right - size.x);
            right = block.rect.origin.x - LINK_GAP;
            links.push(block);
        }
        links.reverse();

        let ratio = shell.backdrop.unwrap_or_default().height_ratio;
        let hero = Rect::new(0.0, NAV_HEIGHT, w, h * ratio);
        let backdrop = shell.backdrop.map(|_| hero);

        let copy_width = (w - 2.0 * GUTTER).min(COPY_MAX_WIDTH).max(0.0);
        let wrap = Some(copy_width);
        let copy = &shell.hero;

        let eyebrow_size = copy.eyebrow.as_deref().map(|t| measure(t, EYEBROW_SIZE, wrap));
        let title_size = title_size(viewport);
        let title_box = measure(&copy.title, title_size, wrap);
        let subtitle_size = copy.subtitle.as_deref().map(|t| measure(t, SUBTITLE_SIZE, wrap));
        let meta_size = copy.meta.as_deref().map(|t| measure(t, META_SIZE, wrap));
        let labels: Vec<Vec2> =
            shell.actions.iter().map(|a| measure(&a.label, BUTTON_SIZE, None)).collect();

        let mut heights: Vec<f32> = Vec::new();
        heights.extend(eyebrow_size.map(|s| s.y));
        heights.push(title_box.y);
        heights.extend(subtitle_size.map(|s| s.y));
        if !labels.is_empty() {
            heights.push(BUTTON_HEIGHT);
        }
        heights.extend(meta_size.map(|s| s.y));
        let total = heights.iter().sum::<f32>() + STACK_GAP * (heights.len() - 1) as f32;

        let mut y = (hero.origin.y + (hero.size.y - total) * 0.5).max(hero.origin.y);
        let mut place = |size: Vec2, font_size: f32| {
            let block = TextBlock {
                rect: Rect::new(GUTTER, y, size.x, size.y),
                font_size,
                max_width: wrap,
            };
            y += size.y + STACK_GAP;
            block
        };

        let eyebrow = eyebrow_size.map(|s| place(s, EYEBROW_SIZE));
        let title = place(title_box, title_size);
        let subtitle = subtitle_size.map(|s| place(s, SUBTITLE_SIZE));

        let mut buttons = Vec::with_capacity(labels.len());
        if !labels.is_empty() {
            let row = place(Vec2::new(copy_width, BUTTON_HEIGHT), BUTTON_SIZE).rect;
            let mut x = row.origin.x;
            for label in labels {
                let rect = Rect::new(x, row.origin.y, label.x + 2.0 * BUTTON_PAD_X, BUTTON_HEIGHT);
                let text = Rect::new(
                    x + BUTTON_PAD_X,
                    row.origin.y + (BUTTON_HEIGHT - label.y) * 0.5,
                    label.x,
                    label.y,
                );
                buttons.push(ButtonBox {
                    rect,
                    label: TextBlock { rect: text, font_size: BUTTON_SIZE, max_width: None },
                });
                x += rect.size.x + BUTTON_GAP;
            }
        }

        let meta = meta_size.map(|s| place(s, META_SIZE));

        Self {
            viewport,
            nav,
            brand,
            links,
            hero,
            backdrop,
            eyebrow,
            title,
            subtitle,
            buttons,
            meta,
        }
    }
}

/// Single-line run vertically centered in the nav bar, starting at `x`.
fn centered_in_bar(size: Vec2, font_size: f32, x: f32) -> TextBlock {
    TextBlock {
        rect: Rect::new(x, (NAV_HEIGHT - size.y) * 0.5, size.x, size.y),
        font_size,
        max_width: None,
    }
}
