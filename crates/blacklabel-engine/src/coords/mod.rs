//! Flat page coordinates.
//!
//! Logical pixels (DPI-aware), origin top-left, +X right, +Y down. Points and
//! sizes are `glam::Vec2`, the same math crate the 3D side uses.

mod rect;
mod viewport;

pub use glam::Vec2;
pub use rect::Rect;
pub use viewport::Viewport;
