use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::coords::Viewport;

use super::{
    Engine, EngineError, Geometry, GeometryId, MaterialId, PerspectiveCamera, Registry,
    RendererId, RendererOptions, Resource, Scene, StandardMaterial,
};

/// What one [`Engine::render`] call on a [`HeadlessEngine`] saw.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRecord {
    pub renderer: RendererId,
    pub size: Viewport,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub camera_aspect: f32,
    pub light_positions: Vec<Vec3>,
    pub mesh_matrices: Vec<Mat4>,
}

/// In-memory [`Engine`] for tests and for running without a GPU.
///
/// Records creation and disposal order and a summary of the most recent
/// frame. With [`failing_after`](Self::failing_after) resource creation starts
/// failing once a given number of resources has been created.
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    registry: Registry,
    created: Vec<Resource>,
    disposed: Vec<Resource>,
    fail_after: Option<usize>,
    frames: usize,
    last_render: Option<RenderRecord>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine whose `n + 1`-th creation call fails.
    pub fn failing_after(n: usize) -> Self {
        Self { fail_after: Some(n), ..Self::default() }
    }

    pub fn into_shared(self) -> Rc<RefCell<HeadlessEngine>> {
        Rc::new(RefCell::new(self))
    }

    /// Resources created so far, in creation order.
    pub fn created(&self) -> &[Resource] {
        &self.created
    }

    /// Resources disposed so far, in disposal order.
    pub fn disposed(&self) -> &[Resource] {
        &self.disposed
    }

    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    pub fn disposed_count(&self) -> usize {
        self.disposed.len()
    }

    pub fn live_count(&self) -> usize {
        self.registry.live_count()
    }

    pub fn is_alive(&self, resource: Resource) -> bool {
        self.registry.contains(resource)
    }

    pub fn renderer_size(&self, renderer: RendererId) -> Option<Viewport> {
        self.registry.surface(renderer).map(|s| s.size)
    }

    pub fn renderer_options(&self, renderer: RendererId) -> Option<RendererOptions> {
        self.registry.surface(renderer).map(|s| s.options)
    }

    pub fn frames_rendered(&self) -> usize {
        self.frames
    }

    pub fn last_render(&self) -> Option<&RenderRecord> {
        self.last_render.as_ref()
    }

    fn admit(&self, what: &str) -> Result<(), EngineError> {
        match self.fail_after {
            Some(n) if self.created.len() >= n => Err(EngineError::CreationFailed(format!(
                "{what}: headless limit of {n} resources reached"
            ))),
            _ => Ok(()),
        }
    }

    fn record<T: Copy + Into<Resource>>(&mut self, id: T) -> T {
        self.created.push(id.into());
        id
    }
}

impl Engine for HeadlessEngine {
    fn backend_name(&self) -> &str {
        "headless"
    }

    fn create_geometry(&mut self, geometry: Geometry) -> Result<GeometryId, EngineError> {
        self.admit("geometry")?;
        let id = self.registry.add_geometry(geometry)?;
        Ok(self.record(id))
    }

    fn create_material(&mut self, material: StandardMaterial) -> Result<MaterialId, EngineError> {
        self.admit("material")?;
        let id = self.registry.add_material(material)?;
        Ok(self.record(id))
    }

    fn create_renderer(&mut self, options: RendererOptions) -> Result<RendererId, EngineError> {
        self.admit("renderer")?;
        let id = self.registry.add_surface(options)?;
        Ok(self.record(id))
    }

    fn set_size(&mut self, renderer: RendererId, size: Viewport) -> Result<(), EngineError> {
        self.registry.set_size(renderer, size)
    }

    fn render(
        &mut self,
        renderer: RendererId,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<(), EngineError> {
        self.registry.check_scene(renderer, scene)?;
        let size = self.renderer_size(renderer).unwrap_or_default();

        self.frames += 1;
        self.last_render = Some(RenderRecord {
            renderer,
            size,
            camera_position: camera.position,
            camera_target: camera.target(),
            camera_aspect: camera.aspect,
            light_positions: scene.lights().iter().map(|l| l.position).collect(),
            mesh_matrices: scene.meshes().iter().map(|m| m.transform.matrix()).collect(),
        });
        Ok(())
    }

    fn dispose(&mut self, resource: Resource) -> Result<(), EngineError> {
        self.registry.remove(resource)?;
        self.disposed.push(resource);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{Light, Mesh, SharedEngine, Transform};
    use crate::paint::Color;

    fn plane() -> Geometry {
        Geometry::Plane { width: 2.0, height: 2.0 }
    }

    // ── creation / disposal ───────────────────────────────────────────────

    #[test]
    fn tracks_creation_and_disposal_order() {
        let mut engine = HeadlessEngine::new();
        let r = engine.create_renderer(RendererOptions::default()).unwrap();
        let g = engine.create_geometry(plane()).unwrap();
        let m = engine.create_material(StandardMaterial::default()).unwrap();
        assert_eq!(engine.created(), &[r.into(), g.into(), m.into()]);
        assert_eq!(engine.live_count(), 3);

        engine.dispose(m.into()).unwrap();
        engine.dispose(g.into()).unwrap();
        engine.dispose(r.into()).unwrap();
        assert_eq!(engine.disposed(), &[m.into(), g.into(), r.into()]);
        assert_eq!(engine.live_count(), 0);
        assert!(!engine.is_alive(r.into()));
    }

    #[test]
    fn double_dispose_is_an_error_and_not_recorded() {
        let mut engine = HeadlessEngine::new();
        let g = engine.create_geometry(plane()).unwrap();
        engine.dispose(g.into()).unwrap();
        assert!(matches!(engine.dispose(g.into()), Err(EngineError::UnknownResource(_))));
        assert_eq!(engine.disposed_count(), 1);
    }

    #[test]
    fn failing_after_limits_creation() {
        let mut engine = HeadlessEngine::failing_after(1);
        assert!(engine.create_renderer(RendererOptions::default()).is_ok());
        let err = engine.create_geometry(plane()).unwrap_err();
        assert!(matches!(err, EngineError::CreationFailed(_)));
        assert_eq!(engine.created_count(), 1);
    }

    #[test]
    fn renderer_starts_at_zero_size() {
        let mut engine = HeadlessEngine::new();
        let r = engine.create_renderer(RendererOptions::default()).unwrap();
        assert_eq!(engine.renderer_size(r), Some(Viewport::default()));
        engine.set_size(r, Viewport::new(1024.0, 614.4)).unwrap();
        assert_eq!(engine.renderer_size(r), Some(Viewport::new(1024.0, 614.4)));
    }

    // ── render ────────────────────────────────────────────────────────────

    #[test]
    fn render_records_camera_and_lights() {
        let mut engine = HeadlessEngine::new();
        let r = engine.create_renderer(RendererOptions::default()).unwrap();
        let g = engine.create_geometry(plane()).unwrap();
        let m = engine.create_material(StandardMaterial::default()).unwrap();

        let mut scene = Scene::new(Color::BLACK);
        scene.add_light(Light::point(Color::WHITE, 1.0, 10.0, 2.0).at(Vec3::new(1.0, 2.0, 3.0)));
        scene.add_mesh(Mesh::new(g, m, Transform::IDENTITY));

        let mut camera = PerspectiveCamera::new(45.0, 2.0, 0.1, 100.0);
        camera.position = Vec3::new(0.0, 3.0, 10.0);
        camera.look_at(Vec3::ZERO);

        engine.render(r, &scene, &camera).unwrap();
        let rec = engine.last_render().unwrap();
        assert_eq!(rec.renderer, r);
        assert_eq!(rec.camera_position, Vec3::new(0.0, 3.0, 10.0));
        assert_eq!(rec.camera_target, Vec3::ZERO);
        assert_eq!(rec.light_positions, vec![Vec3::new(1.0, 2.0, 3.0)]);
        assert_eq!(rec.mesh_matrices.len(), 1);
        assert_eq!(engine.frames_rendered(), 1);
    }

    #[test]
    fn render_to_disposed_renderer_fails() {
        let mut engine = HeadlessEngine::new();
        let r = engine.create_renderer(RendererOptions::default()).unwrap();
        engine.dispose(r.into()).unwrap();
        let scene = Scene::new(Color::BLACK);
        let camera = PerspectiveCamera::new(45.0, 1.0, 0.1, 100.0);
        assert!(engine.render(r, &scene, &camera).is_err());
        assert_eq!(engine.frames_rendered(), 0);
    }

    #[test]
    fn coerces_into_shared_engine() {
        let concrete = HeadlessEngine::new().into_shared();
        let shared: SharedEngine = concrete.clone();
        shared.borrow_mut().create_geometry(plane()).unwrap();
        assert_eq!(concrete.borrow().created_count(), 1);
        assert_eq!(shared.borrow().backend_name(), "headless");
    }
}
