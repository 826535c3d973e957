/// The slice of a shape material that steps capture and blend.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Material {
    /// Diffuse RGB in `[0, 1]`.
    pub diffuse: [f64; 3],
    /// `0.0` is opaque, `1.0` fully transparent.
    pub transparency: f64,
}

impl Material {
    pub const NEUTRAL_DIFFUSE: [f64; 3] = [0.8, 0.8, 0.8];

    pub fn new(diffuse: [f64; 3], transparency: f64) -> Self {
        Self {
            diffuse: diffuse.map(|c| c.clamp(0.0, 1.0)),
            transparency: transparency.clamp(0.0, 1.0),
        }
    }

    /// Default opaque grey a host resets to when an override is cleared.
    pub fn neutral() -> Self {
        Self::new(Self::NEUTRAL_DIFFUSE, 0.0)
    }

    /// Neutral color at full transparency, used to fade hidden objects in and out.
    pub fn transparent() -> Self {
        Self::new(Self::NEUTRAL_DIFFUSE, 1.0)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::neutral()
    }
}
