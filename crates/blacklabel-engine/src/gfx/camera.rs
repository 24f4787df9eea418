use glam::{Mat4, Vec3};

/// Right-handed perspective camera (wgpu depth range 0..1).
///
/// Like most scene graphs, changing `fov_y_degrees`, `aspect`, `near` or
/// `far` takes effect only after [`update_projection_matrix`].
///
/// [`update_projection_matrix`]: PerspectiveCamera::update_projection_matrix
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub up: Vec3,
    target: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov_y_degrees,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            up: Vec3::Y,
            target: Vec3::NEG_Z,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Rebuilds the projection from the current parameters.
    ///
    /// A non-finite or non-positive aspect keeps the previous projection.
    pub fn update_projection_matrix(&mut self) {
        if !(self.aspect.is_finite() && self.aspect > 0.0) {
            log::debug!("camera aspect {} ignored; keeping previous projection", self.aspect);
            return;
        }
        self.projection = Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    /// Points the camera at `target`.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view()
    }
}
