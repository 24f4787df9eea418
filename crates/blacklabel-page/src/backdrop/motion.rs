//! Per-frame drift of the camera and lights.
//!
//! Pure functions of the time parameter; [`SceneRig::apply`] writes a
//! [`MotionFrame`] into the scene.
//!
//! [`SceneRig::apply`]: super::SceneRig::apply

use glam::Vec3;

use super::BackdropConfig;

/// Poses for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MotionFrame {
    pub camera_position: Vec3,
    pub look_at: Vec3,
    pub key_position: Vec3,
    /// `None` when the rig has no fill light.
    pub fill_position: Option<Vec3>,
    /// Extra yaw for props on the turntable, in radians.
    pub turntable_yaw: f32,
}

/// Time parameter for a high-resolution timestamp in milliseconds.
pub fn time_parameter(elapsed_ms: f64, time_scale: f64) -> f32 {
    (elapsed_ms * time_scale) as f32
}

/// Camera sways sideways and dollies in and out; the key light drifts along
/// X and the fill light along Z.
pub fn sample(config: &BackdropConfig, t: f32) -> MotionFrame {
    let m = &config.motion;
    let cam = config.camera.position;
    let key = config.lights.key.position;

    MotionFrame {
        camera_position: Vec3::new(
            cam.x + (t * m.camera_sway_frequency).sin() * m.camera_sway_amplitude,
            cam.y,
            cam.z + (t * m.camera_dolly_frequency).cos() * m.camera_dolly_amplitude,
        ),
        look_at: config.camera.look_at,
        key_position: Vec3::new(
            key.x + (t * m.key_drift_frequency).sin() * m.key_drift_amplitude,
            key.y,
            key.z,
        ),
        fill_position: config.lights.fill.map(|fill| {
            let p = fill.position;
            Vec3::new(
                p.x,
                p.y,
                p.z + (t * m.fill_drift_frequency).cos() * m.fill_drift_amplitude,
            )
        }),
        turntable_yaw: t * m.turntable_speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn time_parameter_scales_milliseconds() {
        assert!((time_parameter(1000.0, 0.0006) - 0.6).abs() < 1e-6);
        assert_eq!(time_parameter(0.0, 0.0006), 0.0);
    }

    #[test]
    fn rest_pose_at_t_zero() {
        let f = sample(&BackdropConfig::default(), 0.0);
        assert!(close(f.camera_position, Vec3::new(0.0, 3.2, 19.8)));
        assert!(close(f.key_position, Vec3::new(8.0, 14.0, 10.0)));
        assert!(close(f.fill_position.unwrap(), Vec3::new(-10.0, 4.0, -3.5)));
        assert_eq!(f.look_at, Vec3::new(0.0, 0.2, -6.0));
        assert_eq!(f.turntable_yaw, 0.0);
    }

    #[test]
    fn quarter_period_of_the_sway() {
        // sin(0.6 t) = 1 at t = π / 1.2
        let t = std::f32::consts::PI / 1.2;
        let f = sample(&BackdropConfig::default(), t);
        assert!((f.camera_position.x - 2.4).abs() < 1e-4);
        assert_eq!(f.camera_position.y, 3.2);
    }

    #[test]
    fn amplitudes_bound_the_drift() {
        let config = BackdropConfig::default();
        for i in 0..500 {
            let f = sample(&config, i as f32 * 0.37);
            assert!(f.camera_position.x.abs() <= 2.4 + 1e-4);
            assert!((f.camera_position.z - 18.0).abs() <= 1.8 + 1e-4);
            assert!((f.key_position.x - 8.0).abs() <= 2.0 + 1e-4);
            assert!((f.fill_position.unwrap().z + 6.0).abs() <= 2.5 + 1e-4);
        }
    }

    #[test]
    fn no_fill_light_no_fill_pose() {
        let mut config = BackdropConfig::default();
        config.lights.fill = None;
        assert_eq!(sample(&config, 1.0).fill_position, None);
    }
}
