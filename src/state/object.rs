use crate::animation::interp::{MaterialEndpoint, blend_material, blend_transform};
use crate::foundation::error::{InbetweenError, InbetweenResult};
use crate::host::SceneObject;
use crate::state::material::Material;
use crate::state::transform::Transform;

/// Snapshot of one scene object at one keyframe.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ObjectState {
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    /// Override material; only ever `Some` for objects that support overrides.
    #[serde(default)]
    pub material: Option<Material>,
}

impl ObjectState {
    /// Read `obj`'s placement, visibility and (for linked instances) override material.
    ///
    /// Fails with [`InbetweenError::MalformedTransform`] if the placement does not decode into
    /// a 4x4 matrix; objects without a placement are a caller error.
    pub fn capture(obj: &dyn SceneObject) -> InbetweenResult<Self> {
        let components = obj.placement().ok_or_else(|| {
            InbetweenError::validation(format!("object '{}' has no placement", obj.name()))
        })?;
        let transform = Transform::from_components(&components).map_err(|e| match e {
            InbetweenError::MalformedTransform(msg) => {
                InbetweenError::malformed_transform(format!("object '{}': {msg}", obj.name()))
            }
            other => other,
        })?;
        let material = if obj.supports_material_override() {
            obj.material_override()
        } else {
            None
        };
        Ok(Self {
            name: obj.name().to_string(),
            transform,
            visible: obj.is_visible(),
            material,
        })
    }

    /// Set the object to exactly this state. A missing object is a no-op.
    pub fn apply(&self, obj: Option<&mut dyn SceneObject>) {
        let Some(obj) = obj else {
            return;
        };
        obj.set_placement(&self.transform);
        obj.set_visible(self.visible);
        if obj.supports_material_override() {
            obj.set_material_override(self.material);
        }
    }

    /// The state shown at progress `t` between `prev` and `cur`.
    ///
    /// `t <= 0` yields `prev` and `t >= 1` yields `cur` exactly. In between, the placement is
    /// slerped/lerped; for override-capable objects a hidden endpoint fades through full
    /// transparency, which keeps the object visible for the whole transition.
    pub fn blend(prev: &Self, cur: &Self, t: f64, material_capable: bool) -> Self {
        if t <= 0.0 {
            return prev.clone();
        }
        if t >= 1.0 {
            return cur.clone();
        }

        let transform = blend_transform(&prev.transform, &cur.transform, t);
        if !material_capable {
            return Self {
                name: cur.name.clone(),
                transform,
                visible: prev.visible,
                material: None,
            };
        }

        let material = blend_material(
            MaterialEndpoint {
                material: prev.material,
                visible: prev.visible,
            },
            MaterialEndpoint {
                material: cur.material,
                visible: cur.visible,
            },
            t,
        );
        Self {
            name: cur.name.clone(),
            transform,
            visible: material.is_some() || prev.visible,
            material,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/object.rs"]
mod tests;
