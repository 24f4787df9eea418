use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::coords::Viewport;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// All callbacks run on the UI thread, one at a time.
pub trait App {
    /// Called for raw window events before the runtime handles them.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called whenever the window's logical size changes, including once
    /// right after the window is created. Every change is delivered.
    fn on_resize(&mut self, viewport: Viewport) {
        let _ = viewport;
    }

    /// Called once per display refresh.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called exactly once before the window and GPU context are torn down.
    fn on_exit(&mut self) {}
}
