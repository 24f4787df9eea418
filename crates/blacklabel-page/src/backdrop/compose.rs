use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use blacklabel_engine::coords::Viewport;
use blacklabel_engine::gfx::{
    Engine, EngineError, Geometry, Light, LightKey, Mesh, MeshKey, PerspectiveCamera, Scene,
    StandardMaterial, Transform,
};

use super::motion::MotionFrame;
use super::{BackdropConfig, ResourceLedger};

/// The composed scene plus handles to the parts that move.
#[derive(Debug, Clone)]
pub struct SceneRig {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    key: LightKey,
    fill: Option<LightKey>,
    /// Turntable meshes with their resting yaw.
    spinning: Vec<(MeshKey, f32)>,
}

impl SceneRig {
    /// Builds the scene graph, creating one geometry and one material per
    /// mesh. Every created resource is recorded in `ledger` before the next
    /// creation, so a failure leaves the ledger holding exactly what exists.
    pub fn compose(
        engine: &mut dyn Engine,
        config: &BackdropConfig,
        size: Viewport,
        ledger: &mut ResourceLedger,
    ) -> Result<Self, EngineError> {
        let mut scene = Scene::new(config.background);
        scene.fog = config.fog;

        let lights = &config.lights;
        let hemi = &lights.hemisphere;
        scene.add_light(Light::hemisphere(hemi.sky, hemi.ground, hemi.intensity));

        let k = &lights.key;
        let key = scene.add_light(
            Light::spot(k.color, k.intensity, k.distance, k.angle, k.penumbra, k.decay)
                .at(k.position)
                .aimed_at(k.target),
        );

        let fill = lights.fill.map(|f| {
            scene.add_light(Light::point(f.color, f.intensity, f.distance, f.decay).at(f.position))
        });

        let floor = &config.floor;
        let floor_transform = Transform::from_position(Vec3::new(0.0, floor.y, 0.0))
            .with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0));
        add_mesh(
            engine,
            ledger,
            &mut scene,
            Geometry::Plane { width: floor.size, height: floor.size },
            StandardMaterial::new(floor.color, floor.roughness, floor.metalness),
            floor_transform,
        )?;

        let mut spinning = Vec::new();
        for prop in &config.props {
            let transform = Transform::from_position(prop.position).with_rotation(prop.rotation);
            let mesh = add_mesh(
                engine,
                ledger,
                &mut scene,
                prop.geometry,
                StandardMaterial::new(prop.color, prop.roughness, prop.metalness),
                transform,
            )?;
            if prop.on_turntable {
                spinning.push((mesh, prop.rotation.y));
            }
        }

        let cam = &config.camera;
        let aspect = size.aspect().unwrap_or(1.0);
        let mut camera = PerspectiveCamera::new(cam.fov_y_degrees, aspect, cam.near, cam.far);
        camera.position = cam.position;
        camera.look_at(cam.look_at);

        Ok(Self { scene, camera, key, fill, spinning })
    }

    /// Writes one frame's poses into the scene and camera.
    pub fn apply(&mut self, frame: &MotionFrame) {
        self.camera.position = frame.camera_position;
        self.camera.look_at(frame.look_at);

        if let Some(key) = self.scene.light_mut(self.key) {
            key.position = frame.key_position;
        }
        if let (Some(fill), Some(pos)) = (self.fill, frame.fill_position)
            && let Some(light) = self.scene.light_mut(fill)
        {
            light.position = pos;
        }
        for &(mesh, rest_yaw) in &self.spinning {
            if let Some(m) = self.scene.mesh_mut(mesh) {
                m.transform.rotation.y = rest_yaw + frame.turntable_yaw;
            }
        }
    }

    /// Applies a new surface size to the camera. Sizes without a usable
    /// aspect ratio leave the projection untouched.
    pub fn resize(&mut self, size: Viewport) -> bool {
        let Some(aspect) = size.aspect() else {
            log::debug!("backdrop: keeping aspect {} for {size:?}", self.camera.aspect);
            return false;
        };
        self.camera.set_aspect(aspect);
        self.camera.update_projection_matrix();
        true
    }
}

fn add_mesh(
    engine: &mut dyn Engine,
    ledger: &mut ResourceLedger,
    scene: &mut Scene,
    geometry: Geometry,
    material: StandardMaterial,
    transform: Transform,
) -> Result<MeshKey, EngineError> {
    let geometry = engine.create_geometry(geometry)?;
    ledger.record(geometry);
    let material = engine.create_material(material)?;
    ledger.record(material);
    Ok(scene.add_mesh(Mesh::new(geometry, material, transform)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backdrop::motion;
    use blacklabel_engine::gfx::HeadlessEngine;

    fn rig(config: &BackdropConfig) -> (SceneRig, HeadlessEngine, ResourceLedger) {
        let mut engine = HeadlessEngine::new();
        let mut ledger = ResourceLedger::new();
        let rig = SceneRig::compose(&mut engine, config, Viewport::new(1024.0, 768.0), &mut ledger)
            .unwrap();
        (rig, engine, ledger)
    }

    #[test]
    fn composes_lights_floor_and_props() {
        let config = BackdropConfig::default();
        let (rig, engine, ledger) = rig(&config);
        assert_eq!(rig.scene.lights().len(), 3);
        assert_eq!(rig.scene.meshes().len(), 1 + config.props.len());
        assert_eq!(ledger.len(), 2 * (1 + config.props.len()));
        assert_eq!(engine.live_count(), ledger.len());
        assert!((rig.camera.aspect - 1024.0 / 768.0).abs() < 1e-6);
        assert_eq!(rig.camera.target(), config.camera.look_at);
    }

    #[test]
    fn floor_lies_flat_below_the_origin() {
        let (rig, _, _) = rig(&BackdropConfig::bare());
        let floor = rig.scene.meshes()[0].transform;
        let up = floor.matrix().transform_vector3(Vec3::Z);
        assert!((up - Vec3::Y).length() < 1e-5);
        assert_eq!(floor.position.y, -1.6);
    }

    #[test]
    fn apply_moves_camera_lights_and_turntable() {
        let config = BackdropConfig::default();
        let (mut rig, _, _) = rig(&config);
        let frame = motion::sample(&config, 2.0);
        rig.apply(&frame);

        assert_eq!(rig.camera.position, frame.camera_position);
        assert_eq!(rig.scene.light(rig.key).map(|l| l.position), Some(frame.key_position));
        assert_eq!(rig.scene.light(rig.fill.unwrap()).map(|l| l.position), frame.fill_position);
        let (mesh, _) = rig.spinning[0];
        assert_eq!(rig.scene.mesh(mesh).unwrap().transform.rotation.y, frame.turntable_yaw);
    }

    #[test]
    fn resize_ignores_zero_height() {
        let (mut rig, _, _) = rig(&BackdropConfig::bare());
        let before = rig.camera;
        assert!(!rig.resize(Viewport::new(800.0, 0.0)));
        assert_eq!(rig.camera, before);
        assert!(rig.resize(Viewport::new(800.0, 400.0)));
        assert_eq!(rig.camera.aspect, 2.0);
    }

    #[test]
    fn failure_leaves_ledger_matching_live_resources() {
        let mut engine = HeadlessEngine::failing_after(3);
        let mut ledger = ResourceLedger::new();
        let result = SceneRig::compose(
            &mut engine,
            &BackdropConfig::default(),
            Viewport::new(800.0, 600.0),
            &mut ledger,
        );
        assert!(result.is_err());
        assert_eq!(ledger.len(), 3);
        assert_eq!(engine.live_count(), 3);
    }
}
