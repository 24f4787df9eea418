use crate::draw::shapes::rect::RectCmd;
use crate::draw::shapes::text::TextCmd;

/// Renderer-agnostic draw command.
///
/// New shapes get a module under `draw::shapes`, a variant here and a
/// renderer under `render::shapes`.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect(RectCmd),
    Text(TextCmd),
}
