use std::f32::consts::PI;

use glam::Vec3;

use blacklabel_engine::gfx::{Fog, Geometry, RendererOptions};
use blacklabel_engine::paint::Color;

const NIGHT: u32 = 0x050509;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraSpec {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Resting position; motion offsets are added to it.
    pub position: Vec3,
    pub look_at: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HemisphereSpec {
    pub sky: Color,
    pub ground: Color,
    pub intensity: f32,
}

/// Key light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpotSpec {
    pub color: Color,
    pub intensity: f32,
    pub distance: f32,
    /// Half-angle in radians.
    pub angle: f32,
    pub penumbra: f32,
    pub decay: f32,
    pub position: Vec3,
    pub target: Vec3,
}

/// Fill light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointSpec {
    pub color: Color,
    pub intensity: f32,
    pub distance: f32,
    pub decay: f32,
    pub position: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightRig {
    pub hemisphere: HemisphereSpec,
    pub key: SpotSpec,
    pub fill: Option<PointSpec>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FloorSpec {
    /// Side length of the square floor plane.
    pub size: f32,
    pub y: f32,
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
}

/// A placeholder solid standing in for a vehicle part or a prop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PropSpec {
    pub geometry: Geometry,
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub position: Vec3,
    /// XYZ Euler angles in radians.
    pub rotation: Vec3,
    /// Spins about Y with the turntable.
    pub on_turntable: bool,
}

impl PropSpec {
    fn solid(geometry: Geometry, color: u32, roughness: f32, metalness: f32, position: Vec3) -> Self {
        Self {
            geometry,
            color: Color::from_hex(color),
            roughness,
            metalness,
            position,
            rotation: Vec3::ZERO,
            on_turntable: true,
        }
    }
}

/// Amplitudes and angular frequencies of the per-frame drift.
///
/// Frequencies are per unit of the time parameter, which advances
/// `time_scale` per millisecond.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MotionConfig {
    pub time_scale: f64,
    pub camera_sway_amplitude: f32,
    pub camera_sway_frequency: f32,
    pub camera_dolly_amplitude: f32,
    pub camera_dolly_frequency: f32,
    pub key_drift_amplitude: f32,
    pub key_drift_frequency: f32,
    pub fill_drift_amplitude: f32,
    pub fill_drift_frequency: f32,
    /// Turntable yaw in radians per unit of the time parameter.
    pub turntable_speed: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            time_scale: 0.0006,
            camera_sway_amplitude: 2.4,
            camera_sway_frequency: 0.6,
            camera_dolly_amplitude: 1.8,
            camera_dolly_frequency: 0.4,
            key_drift_amplitude: 2.0,
            key_drift_frequency: 1.2,
            fill_drift_amplitude: 2.5,
            fill_drift_frequency: 0.8,
            turntable_speed: 0.25,
        }
    }
}

/// Every cosmetic constant of the backdrop.
#[derive(Debug, Clone, PartialEq)]
pub struct BackdropConfig {
    pub background: Color,
    pub fog: Option<Fog>,
    pub camera: CameraSpec,
    pub lights: LightRig,
    pub floor: FloorSpec,
    pub props: Vec<PropSpec>,
    pub motion: MotionConfig,
    /// Surface height as a fraction of the viewport when no container size
    /// is available.
    pub height_ratio: f32,
    pub renderer: RendererOptions,
}

impl BackdropConfig {
    /// The dark showroom without placeholder props.
    pub fn bare() -> Self {
        Self { props: Vec::new(), ..Self::default() }
    }

    pub fn with_props(mut self, props: Vec<PropSpec>) -> Self {
        self.props = props;
        self
    }

    pub fn with_height_ratio(mut self, ratio: f32) -> Self {
        self.height_ratio = ratio;
        self
    }
}

impl Default for BackdropConfig {
    fn default() -> Self {
        let night = Color::from_hex(NIGHT);
        Self {
            background: night,
            fog: Some(Fog::new(night, 18.0, 120.0)),
            camera: CameraSpec {
                fov_y_degrees: 45.0,
                near: 0.1,
                far: 200.0,
                position: Vec3::new(0.0, 3.2, 18.0),
                look_at: Vec3::new(0.0, 0.2, -6.0),
            },
            lights: LightRig {
                hemisphere: HemisphereSpec {
                    sky: Color::WHITE,
                    ground: night,
                    intensity: 0.55,
                },
                key: SpotSpec {
                    color: Color::WHITE,
                    intensity: 1.0,
                    distance: 80.0,
                    angle: PI / 5.0,
                    penumbra: 0.45,
                    decay: 1.2,
                    position: Vec3::new(8.0, 14.0, 10.0),
                    target: Vec3::new(0.0, 0.0, -5.0),
                },
                fill: Some(PointSpec {
                    color: Color::from_hex(0x0a0c19),
                    intensity: 0.35,
                    distance: 40.0,
                    decay: 2.0,
                    position: Vec3::new(-10.0, 4.0, -6.0),
                }),
            },
            floor: FloorSpec {
                size: 160.0,
                y: -1.6,
                color: Color::from_hex(0x04040a),
                roughness: 0.8,
                metalness: 0.18,
            },
            props: default_props(),
            motion: MotionConfig::default(),
            height_ratio: 0.8,
            renderer: RendererOptions::default(),
        }
    }
}

/// A low slab of a car on a turntable: body, cabin and plinth.
fn default_props() -> Vec<PropSpec> {
    let plinth = PropSpec::solid(
        Geometry::Cylinder {
            radius_top: 4.2,
            radius_bottom: 4.4,
            height: 0.2,
            radial_segments: 48,
        },
        0x0b0b12,
        0.35,
        0.6,
        Vec3::new(0.0, -1.5, -5.0),
    );
    let body = PropSpec::solid(
        Geometry::Box { width: 4.6, height: 0.9, depth: 2.0 },
        0x14141c,
        0.25,
        0.85,
        Vec3::new(0.0, -0.95, -5.0),
    );
    let cabin = PropSpec::solid(
        Geometry::Box { width: 2.4, height: 0.6, depth: 1.7 },
        0x0d0d14,
        0.15,
        0.9,
        Vec3::new(0.0, -0.2, -5.0),
    );
    // Back wall, fixed in place.
    let wall = PropSpec {
        on_turntable: false,
        ..PropSpec::solid(
            Geometry::Box { width: 40.0, height: 12.0, depth: 0.5 },
            0x07070c,
            0.9,
            0.05,
            Vec3::new(0.0, 4.4, -40.0),
        )
    };
    vec![plinth, body, cabin, wall]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_dark_showroom() {
        let c = BackdropConfig::default();
        assert_eq!(c.background, Color::from_hex(0x050509));
        assert_eq!(c.fog.map(|f| (f.near, f.far)), Some((18.0, 120.0)));
        assert_eq!(c.camera.position, Vec3::new(0.0, 3.2, 18.0));
        assert_eq!(c.lights.key.position, Vec3::new(8.0, 14.0, 10.0));
        assert_eq!(c.height_ratio, 0.8);
        assert_eq!(c.motion.time_scale, 0.0006);
    }

    #[test]
    fn default_props_are_valid_geometry() {
        for prop in BackdropConfig::default().props {
            assert!(prop.geometry.validate().is_ok(), "{prop:?}");
        }
    }

    #[test]
    fn bare_has_no_props() {
        assert!(BackdropConfig::bare().props.is_empty());
    }
}
