use cgmath::Vector3;

/// The single directional light of a scene. No shadows, no attenuation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vector3<f32>,
    pub colour: Vector3<f32>,
}

impl Light {
    pub fn new(position: Vector3<f32>, colour: Vector3<f32>) -> Self {
        Self { position, colour }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(
            Vector3::new(3000.0, 2000.0, 2000.0),
            Vector3::new(1.0, 1.0, 1.0),
        )
    }
}
