//! Black Label engine crate.
//!
//! Platform + GPU runtime pieces used by the page layer: the winit/wgpu
//! window loop, host environment services (frame scheduling, resize
//! notification, containers), the `gfx` 3D scene abstraction and its
//! backends.

pub mod device;
pub mod window;
pub mod time;
pub mod core;
pub mod host;
pub mod gfx;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod draw;
pub mod text;
