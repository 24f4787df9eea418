use crate::coords::{Rect, Viewport};
use crate::gfx::RendererId;

/// Handle for a host container.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ContainerId(pub(super) u64);

/// A laid-out page box holding rendering surfaces as ordered children.
#[derive(Debug, Clone, Default)]
pub struct Container {
    rect: Rect,
    children: Vec<RendererId>,
}

impl Container {
    pub fn new(rect: Rect) -> Self {
        Self { rect, children: Vec::new() }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Updated by layout on every viewport change.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// Current measured width/height.
    pub fn measured_size(&self) -> Viewport {
        self.rect.viewport()
    }

    pub fn children(&self) -> &[RendererId] {
        &self.children
    }

    pub fn append_child(&mut self, surface: RendererId) {
        self.children.push(surface);
    }

    /// Removes every child, returning them in order.
    pub fn clear_children(&mut self) -> Vec<RendererId> {
        std::mem::take(&mut self.children)
    }
}
