//! In-process host used by tests and the command line tool.

use std::collections::BTreeMap;

use crate::foundation::core::{Background, DrawStyle, FrameRGBA, Resolution};
use crate::foundation::error::InbetweenResult;
use crate::host::{Scene, SceneObject, Viewport};
use crate::state::material::Material;
use crate::state::object::ObjectState;
use crate::state::transform::Transform;

pub const LINK_KIND: &str = "App::Link";
pub const PART_KIND: &str = "App::Part";

#[derive(Clone, Debug, PartialEq)]
pub struct MemoryObject {
    name: String,
    kind: String,
    placement: Option<Vec<f64>>,
    visible: bool,
    material_capable: bool,
    material: Option<Material>,
    shape_material: Material,
}

impl MemoryObject {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            name: name.into(),
            material_capable: kind == LINK_KIND,
            kind,
            placement: Some(Transform::IDENTITY.0.to_vec()),
            visible: true,
            material: None,
            shape_material: Material::neutral(),
        }
    }

    /// A linked instance: placement, visibility and material override.
    pub fn link(name: impl Into<String>) -> Self {
        Self::new(name, LINK_KIND)
    }

    pub fn part(name: impl Into<String>) -> Self {
        Self::new(name, PART_KIND)
    }

    pub fn with_placement(mut self, transform: Transform) -> Self {
        self.placement = Some(transform.0.to_vec());
        self
    }

    /// Placement components as-is, including malformed ones.
    pub fn with_raw_placement(mut self, components: Vec<f64>) -> Self {
        self.placement = Some(components);
        self
    }

    pub fn without_placement(mut self) -> Self {
        self.placement = None;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.set_material_override(Some(material));
        self
    }

    pub fn transform(&self) -> Option<Transform> {
        self.placement
            .as_deref()
            .and_then(|c| Transform::from_components(c).ok())
    }

    pub fn shape_material(&self) -> Material {
        self.shape_material
    }

    /// Build a linked instance that currently shows `state`.
    pub fn from_state(state: &ObjectState) -> Self {
        let mut obj = Self::link(state.name.clone()).with_placement(state.transform);
        obj.visible = state.visible;
        obj.set_material_override(state.material);
        obj
    }
}

impl SceneObject for MemoryObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn placement(&self) -> Option<Vec<f64>> {
        self.placement.clone()
    }

    fn set_placement(&mut self, transform: &Transform) {
        self.placement = Some(transform.0.to_vec());
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn supports_material_override(&self) -> bool {
        self.material_capable
    }

    fn material_override(&self) -> Option<Material> {
        if self.material_capable {
            self.material
        } else {
            None
        }
    }

    fn set_material_override(&mut self, material: Option<Material>) {
        if !self.material_capable {
            return;
        }
        self.material = material;
        self.shape_material = material.unwrap_or_else(Material::neutral);
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryScene {
    objects: BTreeMap<String, MemoryObject>,
    recomputes: u64,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: MemoryObject) {
        self.objects.insert(object.name.clone(), object);
    }

    pub fn with(mut self, object: MemoryObject) -> Self {
        self.insert(object);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<MemoryObject> {
        self.objects.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&MemoryObject> {
        self.objects.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut MemoryObject> {
        self.objects.get_mut(name)
    }

    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    /// Scene of linked instances reproducing a captured snapshot.
    pub fn from_states<'a>(states: impl IntoIterator<Item = &'a ObjectState>) -> Self {
        let mut scene = Self::new();
        for state in states {
            scene.insert(MemoryObject::from_state(state));
        }
        scene
    }
}

impl Scene for MemoryScene {
    fn object_names(&self) -> Vec<String> {
        self.objects.keys().cloned().collect()
    }

    fn object(&self, name: &str) -> Option<&dyn SceneObject> {
        self.objects.get(name).map(|o| o as &dyn SceneObject)
    }

    fn object_mut(&mut self, name: &str) -> Option<&mut dyn SceneObject> {
        self.objects
            .get_mut(name)
            .map(|o| o as &mut dyn SceneObject)
    }

    fn recompute(&mut self) {
        self.recomputes += 1;
    }
}

/// Viewport without a display: frames are flat fills of the requested background.
#[derive(Clone, Debug, Default)]
pub struct HeadlessViewport {
    pub frames_captured: u64,
    pub events_processed: u64,
    pub selection_clears: u64,
    pub draw_styles: Vec<DrawStyle>,
}

impl HeadlessViewport {
    /// Fill used for [`Background::Current`].
    pub const CURRENT_RGBA: [u8; 4] = [18, 20, 28, 255];

    pub fn new() -> Self {
        Self::default()
    }
}

impl Viewport for HeadlessViewport {
    fn capture_frame(
        &mut self,
        resolution: Resolution,
        background: Background,
    ) -> InbetweenResult<FrameRGBA> {
        self.frames_captured += 1;
        let rgba = background.fill_rgba().unwrap_or(Self::CURRENT_RGBA);
        Ok(FrameRGBA::solid(resolution, rgba))
    }

    fn set_draw_style(&mut self, style: DrawStyle) {
        self.draw_styles.push(style);
    }

    fn clear_selection(&mut self) {
        self.selection_clears += 1;
    }

    fn process_events(&mut self) {
        self.events_processed += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/memory.rs"]
mod tests;
