//! Capabilities the CAD host injects into the core.
//!
//! The core never owns scene objects. Steps refer to them by name and resolve them through
//! [`Scene`] at apply time; an object that no longer resolves is skipped.

pub(crate) mod memory;

use crate::foundation::clock::Clock;
use crate::foundation::core::{Background, DrawStyle, FrameRGBA, Resolution};
use crate::foundation::error::InbetweenResult;
use crate::state::material::Material;
use crate::state::transform::Transform;

/// One live object in the host document.
pub trait SceneObject {
    /// Unique, stable object name within the document.
    fn name(&self) -> &str;

    /// Host type identifier, e.g. `App::Link`.
    fn kind(&self) -> &str;

    /// Raw row-major placement components, or `None` when the object has no placement.
    fn placement(&self) -> Option<Vec<f64>>;

    fn set_placement(&mut self, transform: &Transform);

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    /// Whether this object can carry a per-instance material override (linked instances).
    fn supports_material_override(&self) -> bool {
        false
    }

    /// The active override material, if the override is switched on.
    fn material_override(&self) -> Option<Material> {
        None
    }

    /// `Some` switches the override on with that material; `None` switches it off and resets
    /// the shape material to [`Material::neutral`].
    fn set_material_override(&mut self, _material: Option<Material>) {}
}

/// Name-based access to the live document.
pub trait Scene {
    /// Names of every object in the document, in document order.
    fn object_names(&self) -> Vec<String>;

    fn object(&self, name: &str) -> Option<&dyn SceneObject>;

    fn object_mut(&mut self, name: &str) -> Option<&mut dyn SceneObject>;

    /// Ask the host to recompute the document after a batch of changes.
    fn recompute(&mut self);
}

/// The host view: image capture plus the hooks playback uses to stay responsive.
pub trait Viewport {
    fn capture_frame(
        &mut self,
        resolution: Resolution,
        background: Background,
    ) -> InbetweenResult<FrameRGBA>;

    fn set_draw_style(&mut self, _style: DrawStyle) {}

    fn clear_selection(&mut self) {}

    /// Let the host event loop run. This is the only suspension point of the frame loops.
    fn process_events(&mut self) {}
}

/// Borrowed bundle of host capabilities handed to long-running operations.
pub struct HostContext<'a> {
    pub scene: &'a mut dyn Scene,
    pub viewport: &'a mut dyn Viewport,
    pub clock: &'a dyn Clock,
}

impl<'a> HostContext<'a> {
    pub fn new(
        scene: &'a mut dyn Scene,
        viewport: &'a mut dyn Viewport,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            scene,
            viewport,
            clock,
        }
    }
}
