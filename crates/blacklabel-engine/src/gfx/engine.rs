use std::cell::RefCell;
use std::rc::Rc;

use crate::coords::Viewport;

use super::{
    EngineError, Geometry, GeometryId, MaterialId, PerspectiveCamera, RendererId, Resource,
    Scene, StandardMaterial,
};

/// Options fixed when a rendering surface is created.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RendererOptions {
    pub antialias: bool,
    /// Device pixels per logical pixel.
    pub pixel_ratio: f32,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self { antialias: true, pixel_ratio: 1.0 }
    }
}

/// A 3D backend: owns GPU-side resources and draws scenes into surfaces.
///
/// Resources are created explicitly and must be disposed explicitly; a
/// backend reports disposal of an unknown (or already disposed) resource as
/// [`EngineError::UnknownResource`] rather than ignoring it.
pub trait Engine {
    /// Short human-readable backend name for diagnostics.
    fn backend_name(&self) -> &str;

    fn create_geometry(&mut self, geometry: Geometry) -> Result<GeometryId, EngineError>;

    fn create_material(&mut self, material: StandardMaterial) -> Result<MaterialId, EngineError>;

    /// Creates a rendering surface. It starts at zero size.
    fn create_renderer(&mut self, options: RendererOptions) -> Result<RendererId, EngineError>;

    /// Resizes a surface to `size` logical pixels. Zero sizes are accepted;
    /// such a surface draws nothing.
    fn set_size(&mut self, renderer: RendererId, size: Viewport) -> Result<(), EngineError>;

    /// Submits one frame of `scene` seen through `camera`.
    fn render(
        &mut self,
        renderer: RendererId,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<(), EngineError>;

    fn dispose(&mut self, resource: Resource) -> Result<(), EngineError>;
}

/// Engine handle injected into components. Absence is modelled as
/// `Option<SharedEngine>` at the injection site.
pub type SharedEngine = Rc<RefCell<dyn Engine>>;
