use crate::paint::Color;

use super::EngineError;

/// Physically-flavoured surface description.
///
/// Backends are free to approximate: `roughness` drives highlight spread and
/// `metalness` tints highlights toward the base color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StandardMaterial {
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
}

impl StandardMaterial {
    pub fn new(color: Color, roughness: f32, metalness: f32) -> Self {
        Self { color, roughness, metalness }
    }

    /// Roughness and metalness must lie in `[0, 1]`.
    pub fn validate(&self) -> Result<(), EngineError> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.roughness) || !unit.contains(&self.metalness) {
            return Err(EngineError::InvalidMaterial(format!(
                "roughness {} / metalness {} outside [0, 1]",
                self.roughness, self.metalness
            )));
        }
        if !self.color.is_finite() {
            return Err(EngineError::InvalidMaterial("non-finite color".to_string()));
        }
        Ok(())
    }
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self::new(Color::WHITE, 1.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_material_is_valid() {
        assert!(StandardMaterial::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_parameters_are_rejected() {
        let m = StandardMaterial::new(Color::WHITE, 1.5, 0.0);
        assert!(matches!(m.validate(), Err(EngineError::InvalidMaterial(_))));
        let m = StandardMaterial::new(Color::WHITE, 0.5, -0.1);
        assert!(m.validate().is_err());
    }
}
