//! 2D draw stream for the page chrome.
//!
//! - renderer-agnostic draw commands
//! - deterministic ordering (z-index + insertion order)
//! - shape-specific push helpers under `draw::shapes`

mod cmd;
mod list;
mod layer;

pub mod shapes;

pub use cmd::DrawCmd;
pub use layer::{SortKey, ZIndex};
pub use list::{DrawItem, DrawList};
