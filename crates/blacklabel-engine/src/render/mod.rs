//! GPU rendering subsystem.
//!
//! Shape renderers consume `draw` streams for the page chrome; the mesh
//! backend draws `gfx` scenes into container regions. Each renderer owns its
//! GPU resources (pipelines, buffers) and creates them lazily.
//!
//! Convention:
//! - 2D geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.

mod ctx;
pub mod mesh;
pub mod shapes;

pub use ctx::{RenderCtx, RenderTarget};
