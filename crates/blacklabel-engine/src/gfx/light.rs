use glam::Vec3;

use crate::paint::Color;

/// Light variants understood by every backend.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LightKind {
    /// Uniform fill from every direction.
    Ambient,
    /// Sky color from above blending into `ground` from below.
    Hemisphere { ground: Color },
    /// Parallel rays travelling from `position` toward `target`.
    Directional { target: Vec3 },
    /// Cone from `position` toward `target`.
    ///
    /// `angle` is the half-angle in radians, `penumbra` the soft fraction of
    /// the cone edge in `[0, 1]`, `distance` the cut-off range (0 = infinite).
    Spot {
        target: Vec3,
        distance: f32,
        angle: f32,
        penumbra: f32,
        decay: f32,
    },
    /// Omni light with range cut-off `distance` (0 = infinite).
    Point { distance: f32, decay: f32 },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Self { kind: LightKind::Ambient, color, intensity, position: Vec3::ZERO }
    }

    pub fn hemisphere(sky: Color, ground: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Hemisphere { ground },
            color: sky,
            intensity,
            position: Vec3::Y,
        }
    }

    pub fn directional(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional { target: Vec3::ZERO },
            color,
            intensity,
            position: Vec3::Y,
        }
    }

    pub fn spot(color: Color, intensity: f32, distance: f32, angle: f32, penumbra: f32, decay: f32) -> Self {
        Self {
            kind: LightKind::Spot { target: Vec3::ZERO, distance, angle, penumbra, decay },
            color,
            intensity,
            position: Vec3::Y,
        }
    }

    pub fn point(color: Color, intensity: f32, distance: f32, decay: f32) -> Self {
        Self {
            kind: LightKind::Point { distance, decay },
            color,
            intensity,
            position: Vec3::ZERO,
        }
    }

    /// Moves the light.
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the aim point of directional and spot lights; other kinds ignore it.
    pub fn aimed_at(mut self, aim: Vec3) -> Self {
        match &mut self.kind {
            LightKind::Directional { target } | LightKind::Spot { target, .. } => *target = aim,
            LightKind::Ambient | LightKind::Hemisphere { .. } | LightKind::Point { .. } => {}
        }
        self
    }

    /// Unit direction the light travels, for directional and spot lights.
    pub fn direction(&self) -> Option<Vec3> {
        match self.kind {
            LightKind::Directional { target } | LightKind::Spot { target, .. } => {
                (target - self.position).try_normalize()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_aims_from_position_to_target() {
        let l = Light::spot(Color::WHITE, 1.0, 80.0, 0.6, 0.45, 1.2)
            .at(Vec3::new(0.0, 10.0, 0.0))
            .aimed_at(Vec3::ZERO);
        assert_eq!(l.direction(), Some(Vec3::NEG_Y));
    }

    #[test]
    fn aiming_a_point_light_changes_nothing() {
        let l = Light::point(Color::WHITE, 0.35, 40.0, 2.0).at(Vec3::X);
        assert_eq!(l.aimed_at(Vec3::Z), l);
        assert_eq!(l.direction(), None);
    }

    #[test]
    fn degenerate_aim_has_no_direction() {
        let l = Light::directional(Color::WHITE, 1.0).at(Vec3::ONE).aimed_at(Vec3::ONE);
        assert_eq!(l.direction(), None);
    }
}
