use std::collections::HashMap;

use glam::{Mat4, Vec3};

use crate::coords::Viewport;
use crate::gfx::{
    Engine, EngineError, Fog, Geometry, GeometryId, Light, MaterialId, MeshData,
    PerspectiveCamera, Registry, RendererId, RendererOptions, Resource, Scene, StandardMaterial,
};
use crate::paint::Color;

/// One mesh instance resolved for drawing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MeshDraw {
    pub geometry: GeometryId,
    pub model: Mat4,
    pub material: StandardMaterial,
}

/// Everything the GPU side needs to draw one surface for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSubmission {
    pub renderer: RendererId,
    pub size: Viewport,
    pub options: RendererOptions,
    pub clear: Color,
    pub fog: Option<Fog>,
    pub view_proj: Mat4,
    pub camera_position: Vec3,
    pub lights: Vec<Light>,
    pub draws: Vec<MeshDraw>,
}

impl FrameSubmission {
    /// Zero-area surfaces are never drawn.
    pub fn is_drawable(&self) -> bool {
        self.size.is_valid()
    }
}

/// CPU half of the wgpu backend.
#[derive(Debug, Default)]
pub struct WgpuEngine {
    registry: Registry,
    meshes: HashMap<GeometryId, MeshData>,
    pending: Vec<FrameSubmission>,
    released: Vec<Resource>,
}

impl WgpuEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tessellated vertex data for a live geometry.
    pub fn mesh_data(&self, id: GeometryId) -> Option<&MeshData> {
        self.meshes.get(&id)
    }

    pub fn renderer_size(&self, id: RendererId) -> Option<Viewport> {
        self.registry.surface(id).map(|s| s.size)
    }

    pub fn renderer_options(&self, id: RendererId) -> Option<RendererOptions> {
        self.registry.surface(id).map(|s| s.options)
    }

    /// Drains queued frames, at most one per surface.
    pub fn take_frames(&mut self) -> Vec<FrameSubmission> {
        std::mem::take(&mut self.pending)
    }

    /// Drains resources disposed since the last call, so GPU copies can go.
    pub fn take_released(&mut self) -> Vec<Resource> {
        std::mem::take(&mut self.released)
    }

    pub fn live_count(&self) -> usize {
        self.registry.live_count()
    }
}

impl Engine for WgpuEngine {
    fn backend_name(&self) -> &str {
        "wgpu"
    }

    fn create_geometry(&mut self, geometry: Geometry) -> Result<GeometryId, EngineError> {
        let id = self.registry.add_geometry(geometry)?;
        self.meshes.insert(id, geometry.tessellate());
        Ok(id)
    }

    fn create_material(&mut self, material: StandardMaterial) -> Result<MaterialId, EngineError> {
        self.registry.add_material(material)
    }

    fn create_renderer(&mut self, options: RendererOptions) -> Result<RendererId, EngineError> {
        let id = self.registry.add_surface(options)?;
        log::debug!(
            "wgpu surface {id:?} created (antialias: {}, pixel ratio: {})",
            options.antialias,
            options.pixel_ratio
        );
        Ok(id)
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

        let draws = scene
            .meshes()
            .iter()
            .filter_map(|mesh| {
                let material = *self.registry.material(mesh.material)?;
                Some(MeshDraw {
                    geometry: mesh.geometry,
                    model: mesh.transform.matrix(),
                    material,
                })
            })
            .collect();

        let (size, options) = self
            .registry
            .surface(renderer)
            .map_or_else(Default::default, |s| (s.size, s.options));
        let submission = FrameSubmission {
            renderer,
            size,
            options,
            clear: scene.background,
            fog: scene.fog,
            view_proj: camera.view_projection(),
            camera_position: camera.position,
            lights: scene.lights().to_vec(),
            draws,
        };

        match self.pending.iter_mut().find(|f| f.renderer == renderer) {
            Some(slot) => *slot = submission,
            None => self.pending.push(submission),
        }
        Ok(())
    }

    fn dispose(&mut self, resource: Resource) -> Result<(), EngineError> {
        self.registry.remove(resource)?;
        match resource {
            Resource::Geometry(id) => {
                self.meshes.remove(&id);
            }
            Resource::Renderer(id) => self.pending.retain(|f| f.renderer != id),
            Resource::Material(_) => {}
        }
        self.released.push(resource);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{Mesh, Transform};

    fn scene_with_plane(engine: &mut WgpuEngine) -> Scene {
        let g = engine.create_geometry(Geometry::Plane { width: 4.0, height: 4.0 }).unwrap();
        let m = engine.create_material(StandardMaterial::default()).unwrap();
        let mut scene = Scene::new(Color::from_hex(0x050509));
        scene.add_mesh(Mesh::new(g, m, Transform::from_position(Vec3::new(0.0, -1.6, 0.0))));
        scene
    }

    #[test]
    fn geometry_is_tessellated_on_creation() {
        let mut engine = WgpuEngine::new();
        let g = engine.create_geometry(Geometry::Plane { width: 1.0, height: 1.0 }).unwrap();
        assert_eq!(engine.mesh_data(g).map(|m| m.indices.len()), Some(6));
    }

    #[test]
    fn one_pending_frame_per_surface() {
        let mut engine = WgpuEngine::new();
        let r = engine.create_renderer(RendererOptions::default()).unwrap();
        engine.set_size(r, Viewport::new(800.0, 480.0)).unwrap();
        let scene = scene_with_plane(&mut engine);
        let mut camera = PerspectiveCamera::new(45.0, 800.0 / 480.0, 0.1, 200.0);

        engine.render(r, &scene, &camera).unwrap();
        camera.position = Vec3::new(1.0, 0.0, 0.0);
        engine.render(r, &scene, &camera).unwrap();

        let frames = engine.take_frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].camera_position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(frames[0].draws.len(), 1);
        assert!(frames[0].is_drawable());
        assert!(engine.take_frames().is_empty());
    }

    #[test]
    fn submissions_carry_each_surface_options() {
        let mut engine = WgpuEngine::new();
        let crisp = RendererOptions { antialias: true, pixel_ratio: 2.0 };
        let plain = RendererOptions { antialias: false, pixel_ratio: 1.0 };
        let a = engine.create_renderer(crisp).unwrap();
        let b = engine.create_renderer(plain).unwrap();
        let scene = Scene::new(Color::BLACK);
        let camera = PerspectiveCamera::new(45.0, 1.0, 0.1, 10.0);
        for r in [a, b] {
            engine.set_size(r, Viewport::new(320.0, 200.0)).unwrap();
            engine.render(r, &scene, &camera).unwrap();
        }

        let frames = engine.take_frames();
        assert_eq!(frames[0].options, crisp);
        assert_eq!(frames[1].options, plain);
        assert_ne!(frames[0], frames[1]);
    }

    #[test]
    fn zero_height_submission_is_not_drawable() {
        let mut engine = WgpuEngine::new();
        let r = engine.create_renderer(RendererOptions::default()).unwrap();
        engine.set_size(r, Viewport::new(800.0, 0.0)).unwrap();
        let scene = Scene::new(Color::BLACK);
        engine.render(r, &scene, &PerspectiveCamera::new(45.0, 1.0, 0.1, 10.0)).unwrap();
        assert!(!engine.take_frames()[0].is_drawable());
    }

    #[test]
    fn disposing_a_surface_drops_its_pending_frame() {
        let mut engine = WgpuEngine::new();
        let r = engine.create_renderer(RendererOptions::default()).unwrap();
        let scene = Scene::new(Color::BLACK);
        engine.render(r, &scene, &PerspectiveCamera::new(45.0, 1.0, 0.1, 10.0)).unwrap();

        engine.dispose(r.into()).unwrap();
        assert!(engine.take_frames().is_empty());
        assert_eq!(engine.take_released(), vec![Resource::from(r)]);
        assert_eq!(engine.live_count(), 0);
    }

    #[test]
    fn disposed_geometry_loses_mesh_data() {
        let mut engine = WgpuEngine::new();
        let g = engine.create_geometry(Geometry::Plane { width: 1.0, height: 1.0 }).unwrap();
        engine.dispose(g.into()).unwrap();
        assert!(engine.mesh_data(g).is_none());
        assert!(engine.dispose(g.into()).is_err());
    }
}
