use std::fmt;

use glam::{DMat4, DQuat, DVec3};

use crate::foundation::error::{InbetweenError, InbetweenResult};

/// A 4x4 placement matrix stored row-major, as hosts print and persist it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Transform(pub [f64; 16]);

impl Transform {
    /// The placement of an object that was never moved.
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// Build from raw row-major components; exactly 16 finite values are required.
    pub fn from_components(components: &[f64]) -> InbetweenResult<Self> {
        let arr: [f64; 16] = components.try_into().map_err(|_| {
            InbetweenError::malformed_transform(format!(
                "expected 16 matrix components, got {}",
                components.len()
            ))
        })?;
        if let Some(bad) = arr.iter().find(|v| !v.is_finite()) {
            return Err(InbetweenError::malformed_transform(format!(
                "matrix component {bad} is not finite"
            )));
        }
        Ok(Self(arr))
    }

    /// Parse the host's textual form, e.g. `Matrix((1,0,0,5),(0,1,0,0),(0,0,1,0),(0,0,0,1))`.
    ///
    /// The `Matrix` prefix is optional; whitespace and parentheses are ignored.
    pub fn parse(text: &str) -> InbetweenResult<Self> {
        let body = match text.split_once("Matrix") {
            Some((_, rest)) => rest,
            None => text,
        };
        let cleaned: String = body
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '(' && *c != ')')
            .collect();
        let components = cleaned
            .split(',')
            .map(|v| {
                v.parse::<f64>().map_err(|e| {
                    InbetweenError::malformed_transform(format!("failed parsing '{text}': {e}"))
                })
            })
            .collect::<InbetweenResult<Vec<_>>>()?;
        Self::from_components(&components).map_err(|e| match e {
            InbetweenError::MalformedTransform(msg) => {
                InbetweenError::malformed_transform(format!("failed parsing '{text}': {msg}"))
            }
            other => other,
        })
    }

    /// Pure translation.
    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self::from_mat4(DMat4::from_translation(DVec3::new(x, y, z)))
    }

    /// Rotation of `angle_rad` around `axis` (normalized here) followed by a translation.
    pub fn from_axis_angle(axis: [f64; 3], angle_rad: f64, translation: [f64; 3]) -> Self {
        let rotation = DQuat::from_axis_angle(DVec3::from(axis).normalize(), angle_rad);
        Self::from_mat4(DMat4::from_rotation_translation(
            rotation,
            DVec3::from(translation),
        ))
    }

    /// Translation column `[x, y, z]`.
    pub fn translation(&self) -> [f64; 3] {
        [self.0[3], self.0[7], self.0[11]]
    }

    /// Rotation part, with any scale factored out.
    pub fn rotation(&self) -> DQuat {
        let (_, rotation, _) = self.to_mat4().to_scale_rotation_translation();
        rotation
    }

    /// `1.0` for any rigid placement.
    pub fn determinant(&self) -> f64 {
        self.to_mat4().determinant()
    }

    pub(crate) fn to_mat4(self) -> DMat4 {
        // glam is column-major; reading our rows as columns yields the transpose.
        DMat4::from_cols_array(&self.0).transpose()
    }

    pub(crate) fn from_mat4(m: DMat4) -> Self {
        Self(m.transpose().to_cols_array())
    }

    /// Component-wise comparison within `eps`.
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Matrix(")?;
        for (r, row) in self.0.chunks_exact(4).enumerate() {
            if r > 0 {
                f.write_str(",")?;
            }
            write!(f, "({},{},{},{})", row[0], row[1], row[2], row[3])?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/transform.rs"]
mod tests;
