use std::collections::HashMap;

use crate::coords::Viewport;

use super::{
    EngineError, Geometry, GeometryId, MaterialId, RendererId, RendererOptions, Resource, Scene,
    StandardMaterial,
};

/// Book-keeping for one rendering surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct SurfaceState {
    pub options: RendererOptions,
    pub size: Viewport,
}

/// CPU-side resource table shared by the backends.
///
/// Ids come from one counter across all kinds and are never reused.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    next_id: u64,
    geometries: HashMap<GeometryId, Geometry>,
    materials: HashMap<MaterialId, StandardMaterial>,
    surfaces: HashMap<RendererId, SurfaceState>,
}

impl Registry {
    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> Result<GeometryId, EngineError> {
        geometry.validate()?;
        let id = GeometryId(self.next());
        self.geometries.insert(id, geometry);
        Ok(id)
    }

    pub fn add_material(&mut self, material: StandardMaterial) -> Result<MaterialId, EngineError> {
        material.validate()?;
        let id = MaterialId(self.next());
        self.materials.insert(id, material);
        Ok(id)
    }

    pub fn add_surface(&mut self, options: RendererOptions) -> Result<RendererId, EngineError> {
        if !(options.pixel_ratio.is_finite() && options.pixel_ratio > 0.0) {
            return Err(EngineError::CreationFailed(format!(
                "renderer with pixel ratio {}",
                options.pixel_ratio
            )));
        }
        let id = RendererId(self.next());
        self.surfaces.insert(id, SurfaceState { options, size: Viewport::default() });
        Ok(id)
    }

    pub fn material(&self, id: MaterialId) -> Option<&StandardMaterial> {
        self.materials.get(&id)
    }

    pub fn surface(&self, id: RendererId) -> Option<&SurfaceState> {
        self.surfaces.get(&id)
    }

    /// Stores the reported size; negative or NaN sides become zero.
    pub fn set_size(&mut self, id: RendererId, size: Viewport) -> Result<(), EngineError> {
        let surface = self
            .surfaces
            .get_mut(&id)
            .ok_or(EngineError::UnknownResource(id.into()))?;
        surface.size = Viewport::new(size.width.max(0.0), size.height.max(0.0));
        Ok(())
    }

    /// Ensures the surface and every resource the scene references are live.
    pub fn check_scene(&self, renderer: RendererId, scene: &Scene) -> Result<(), EngineError> {
        if !self.surfaces.contains_key(&renderer) {
            return Err(EngineError::UnknownResource(renderer.into()));
        }
        for mesh in scene.meshes() {
            if !self.geometries.contains_key(&mesh.geometry) {
                return Err(EngineError::UnknownResource(mesh.geometry.into()));
            }
            if !self.materials.contains_key(&mesh.material) {
                return Err(EngineError::UnknownResource(mesh.material.into()));
            }
        }
        Ok(())
    }

    pub fn contains(&self, resource: Resource) -> bool {
        match resource {
            Resource::Geometry(id) => self.geometries.contains_key(&id),
            Resource::Material(id) => self.materials.contains_key(&id),
            Resource::Renderer(id) => self.surfaces.contains_key(&id),
        }
    }

    pub fn remove(&mut self, resource: Resource) -> Result<(), EngineError> {
        let removed = match resource {
            Resource::Geometry(id) => self.geometries.remove(&id).is_some(),
            Resource::Material(id) => self.materials.remove(&id).is_some(),
            Resource::Renderer(id) => self.surfaces.remove(&id).is_some(),
        };
        if removed {
            Ok(())
        } else {
            Err(EngineError::UnknownResource(resource))
        }
    }

    pub fn live_count(&self) -> usize {
        self.geometries.len() + self.materials.len() + self.surfaces.len()
    }
}
