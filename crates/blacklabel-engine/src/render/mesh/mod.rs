//! GPU backend for `gfx` scenes.
//!
//! [`WgpuEngine`] implements [`Engine`](crate::gfx::Engine) on the CPU side:
//! it validates resources, tessellates geometry and queues one
//! [`FrameSubmission`] per surface. [`MeshRenderer`] drains that queue during
//! the window's frame and draws each submission into the screen region of the
//! container that hosts its surface.

mod engine;
mod renderer;

pub use engine::{FrameSubmission, MeshDraw, WgpuEngine};
pub use renderer::MeshRenderer;
