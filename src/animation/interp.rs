//! Pure interpolation primitives behind every inbetween frame.

use glam::DMat4;

use crate::state::material::Material;
use crate::state::transform::Transform;

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for [f64; 3] {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        [
            f64::lerp(&a[0], &b[0], t),
            f64::lerp(&a[1], &b[1], t),
            f64::lerp(&a[2], &b[2], t),
        ]
    }
}

impl Lerp for Material {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Material::new(
            <[f64; 3]>::lerp(&a.diffuse, &b.diffuse, t),
            f64::lerp(&a.transparency, &b.transparency, t),
        )
    }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    f64::lerp(&a, &b, t)
}

/// Rigid blend: translation and scale are lerped, rotation takes the shortest slerp arc.
pub fn blend_transform(a: &Transform, b: &Transform, t: f64) -> Transform {
    let (scale_a, rot_a, pos_a) = a.to_mat4().to_scale_rotation_translation();
    let (scale_b, mut rot_b, pos_b) = b.to_mat4().to_scale_rotation_translation();
    if rot_a.dot(rot_b) < 0.0 {
        rot_b = -rot_b;
    }
    let m = DMat4::from_scale_rotation_translation(
        scale_a.lerp(scale_b, t),
        rot_a.slerp(rot_b, t).normalize(),
        pos_a.lerp(pos_b, t),
    );
    Transform::from_mat4(m)
}

/// One side of a material blend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialEndpoint {
    pub material: Option<Material>,
    pub visible: bool,
}

impl MaterialEndpoint {
    /// The material to blend from or to: hidden endpoints without an override become
    /// [`Material::transparent`].
    pub fn effective(self) -> Option<Material> {
        match self.material {
            Some(m) => Some(m),
            None if !self.visible => Some(Material::transparent()),
            None => None,
        }
    }
}

/// Blend color and transparency channel by channel.
///
/// Returns `None` when neither endpoint needs an override, i.e. both are visible and
/// unmaterialed. Otherwise a missing side is substituted ([`MaterialEndpoint::effective`],
/// falling back to [`Material::neutral`]).
pub fn blend_material(a: MaterialEndpoint, b: MaterialEndpoint, t: f64) -> Option<Material> {
    let (ma, mb) = (a.effective(), b.effective());
    if ma.is_none() && mb.is_none() {
        return None;
    }
    Some(Material::lerp(
        &ma.unwrap_or_else(Material::neutral),
        &mb.unwrap_or_else(Material::neutral),
        t,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interp.rs"]
mod tests;
