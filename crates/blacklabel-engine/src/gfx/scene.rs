use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::paint::Color;

use super::{GeometryId, Light, MaterialId};

/// Linear distance fog.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

impl Fog {
    pub fn new(color: Color, near: f32, far: f32) -> Self {
        Self { color, near, far }
    }

    /// Fog amount at view distance `depth`: 0 before `near`, 1 past `far`,
    /// smoothstepped in between.
    pub fn factor(&self, depth: f32) -> f32 {
        if self.far <= self.near {
            return if depth >= self.far { 1.0 } else { 0.0 };
        }
        let t = ((depth - self.near) / (self.far - self.near)).clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t)
    }
}

/// Position, XYZ Euler rotation (radians) and scale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::IDENTITY }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        let r = self.rotation;
        let q = Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z);
        Mat4::from_scale_rotation_translation(self.scale, q, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A geometry drawn with a material at a transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub transform: Transform,
}

impl Mesh {
    pub fn new(geometry: GeometryId, material: MaterialId, transform: Transform) -> Self {
        Self { geometry, material, transform }
    }
}

/// Index of a light inside its scene.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LightKey(usize);

/// Index of a mesh inside its scene.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MeshKey(usize);

/// Flat scene graph: background, optional fog, lights and mesh instances.
///
/// The scene only references engine resources; disposing them is the owner's
/// job.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub background: Color,
    pub fog: Option<Fog>,
    lights: Vec<Light>,
    meshes: Vec<Mesh>,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self { background, fog: None, lights: Vec::new(), meshes: Vec::new() }
    }

    pub fn with_fog(mut self, fog: Fog) -> Self {
        self.fog = Some(fog);
        self
    }

    pub fn add_light(&mut self, light: Light) -> LightKey {
        self.lights.push(light);
        LightKey(self.lights.len() - 1)
    }

    pub fn light(&self, key: LightKey) -> Option<&Light> {
        self.lights.get(key.0)
    }

    pub fn light_mut(&mut self, key: LightKey) -> Option<&mut Light> {
        self.lights.get_mut(key.0)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshKey {
        self.meshes.push(mesh);
        MeshKey(self.meshes.len() - 1)
    }

    pub fn mesh(&self, key: MeshKey) -> Option<&Mesh> {
        self.meshes.get(key.0)
    }

    pub fn mesh_mut(&mut self, key: MeshKey) -> Option<&mut Mesh> {
        self.meshes.get_mut(key.0)
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── fog ───────────────────────────────────────────────────────────────

    #[test]
    fn fog_ramps_between_near_and_far() {
        let fog = Fog::new(Color::BLACK, 18.0, 120.0);
        assert_eq!(fog.factor(5.0), 0.0);
        assert_eq!(fog.factor(200.0), 1.0);
        assert!((fog.factor(69.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn collapsed_fog_range_is_a_step() {
        let fog = Fog::new(Color::BLACK, 10.0, 10.0);
        assert_eq!(fog.factor(9.9), 0.0);
        assert_eq!(fog.factor(10.0), 1.0);
    }

    // ── transform ─────────────────────────────────────────────────────────

    #[test]
    fn floor_rotation_turns_plane_normal_up() {
        let t = Transform::from_position(Vec3::new(0.0, -1.6, 0.0))
            .with_rotation(Vec3::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0));
        let n = t.matrix().transform_vector3(Vec3::Z);
        assert!((n - Vec3::Y).length() < 1e-5);
        assert_eq!(t.matrix().transform_point3(Vec3::ZERO), Vec3::new(0.0, -1.6, 0.0));
    }

    // ── scene ─────────────────────────────────────────────────────────────

    #[test]
    fn keys_address_what_was_added() {
        let mut scene = Scene::new(Color::BLACK);
        let key = scene.add_light(Light::ambient(Color::WHITE, 0.5));
        if let Some(l) = scene.light_mut(key) {
            l.intensity = 0.25;
        }
        assert_eq!(scene.light(key).map(|l| l.intensity), Some(0.25));
        assert_eq!(scene.lights().len(), 1);

        let m = scene.add_mesh(Mesh::new(GeometryId(1), MaterialId(2), Transform::IDENTITY));
        assert_eq!(scene.mesh(m).map(|m| m.material), Some(MaterialId(2)));
        assert!(scene.mesh(MeshKey(5)).is_none());
    }
}
