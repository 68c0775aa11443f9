use glam::Vec3;

/// Directional light component. Direction comes from the owning node's -Z
/// axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub color: Vec3,
    pub intensity: f32,
}

impl Light {
    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32) -> Self {
        Self { color, intensity }
    }

    /// World-space direction the light travels in, given the owning node's
    /// world matrix.
    #[must_use]
    pub fn direction(world: &glam::Affine3A) -> Vec3 {
        world.transform_vector3(Vec3::NEG_Z).normalize_or_zero()
    }
}
