use std::collections::BTreeMap;

use crate::config::settings::{CaptureFilter, Eligibility};
use crate::foundation::error::{InbetweenError, InbetweenResult};
use crate::host::Scene;
use crate::state::object::ObjectState;

/// Captured object states of one step, keyed by object name.
pub type Snapshot = BTreeMap<String, ObjectState>;

/// Snapshot every eligible object of `scene`.
///
/// Objects without a placement and ignored kinds are left out; placed objects of untracked
/// kinds are left out with a warning. A malformed placement aborts the whole capture.
pub fn capture_scene(scene: &dyn Scene, filter: &CaptureFilter) -> InbetweenResult<Snapshot> {
    let mut snapshot = Snapshot::new();
    for name in scene.object_names() {
        let Some(obj) = scene.object(&name) else {
            continue;
        };
        if obj.placement().is_none() {
            continue;
        }
        match filter.classify(obj.kind()) {
            Eligibility::Ignored => continue,
            Eligibility::Untracked => {
                tracing::warn!(object = %name, kind = obj.kind(), "untracked object kind; skipped");
                continue;
            }
            Eligibility::Tracked => {}
        }
        snapshot.insert(name, ObjectState::capture(obj)?);
    }
    tracing::debug!(objects = snapshot.len(), "captured scene state");
    Ok(snapshot)
}

/// One keyframe: a full scene snapshot plus how long the move to the next step takes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Step {
    name: String,
    duration_secs: u32,
    states: Snapshot,
}

impl Step {
    /// Duration given to freshly captured steps.
    pub const DEFAULT_DURATION_SECS: u32 = 1;

    /// Capture a new step from the live scene with the default duration.
    pub fn capture(
        name: impl Into<String>,
        scene: &dyn Scene,
        filter: &CaptureFilter,
    ) -> InbetweenResult<Self> {
        Ok(Self {
            name: name.into(),
            duration_secs: Self::DEFAULT_DURATION_SECS,
            states: capture_scene(scene, filter)?,
        })
    }

    /// Build a step from stored states; the duration must be at least one second.
    pub fn from_states(
        name: impl Into<String>,
        duration_secs: u32,
        states: Snapshot,
    ) -> InbetweenResult<Self> {
        let mut step = Self {
            name: name.into(),
            duration_secs: Self::DEFAULT_DURATION_SECS,
            states,
        };
        step.set_duration_secs(duration_secs)?;
        Ok(step)
    }

    /// Rebuild the snapshot from the live scene, keeping the duration.
    ///
    /// On failure the previous snapshot is left untouched.
    pub fn recapture(&mut self, scene: &dyn Scene, filter: &CaptureFilter) -> InbetweenResult<()> {
        self.states = capture_scene(scene, filter)?;
        Ok(())
    }

    /// Unique name of the step within its animation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Seconds the move from this step to the next one takes.
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Set the duration; zero is rejected.
    pub fn set_duration_secs(&mut self, secs: u32) -> InbetweenResult<()> {
        if secs == 0 {
            return Err(InbetweenError::validation(
                "step duration must be at least one second",
            ));
        }
        self.duration_secs = secs;
        Ok(())
    }

    /// Every captured object state, keyed by object name.
    pub fn states(&self) -> &Snapshot {
        &self.states
    }

    /// Captured state of one object, if this step tracks it.
    pub fn state(&self, object: &str) -> Option<&ObjectState> {
        self.states.get(object)
    }

    /// Jump the scene to this step without animating, then recompute.
    pub fn apply_instant(&self, scene: &mut dyn Scene) {
        for (name, state) in &self.states {
            match scene.object_mut(name) {
                Some(obj) => state.apply(Some(obj)),
                None => tracing::warn!(
                    object = %name,
                    step = %self.name,
                    "object missing from scene; skipped"
                ),
            }
        }
        scene.recompute();
    }

    /// Show progress `t` of the move from `prev` to this step.
    ///
    /// Only objects captured in both steps move; the others are left as they are.
    pub fn blend_frame(&self, prev: &Step, t: f64, scene: &mut dyn Scene) {
        for (name, cur) in &self.states {
            let Some(before) = prev.states.get(name) else {
                continue;
            };
            let Some(obj) = scene.object_mut(name) else {
                tracing::trace!(object = %name, "object missing from scene; skipped");
                continue;
            };
            let blended = ObjectState::blend(before, cur, t, obj.supports_material_override());
            blended.apply(Some(obj));
        }
    }

    /// Nested mapping stored as the step's host property.
    pub fn to_property(&self) -> InbetweenResult<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| InbetweenError::serde(e.to_string()))
    }

    /// Restore a step from its host property, checking duration and key consistency.
    pub fn from_property(value: serde_json::Value) -> InbetweenResult<Self> {
        let step: Self =
            serde_json::from_value(value).map_err(|e| InbetweenError::serde(e.to_string()))?;
        if step.duration_secs == 0 {
            return Err(InbetweenError::validation(format!(
                "step '{}' has a zero duration",
                step.name
            )));
        }
        if let Some((key, state)) = step.states.iter().find(|(k, s)| **k != s.name) {
            return Err(InbetweenError::serde(format!(
                "step '{}' stores '{}' under key '{key}'",
                step.name, state.name
            )));
        }
        Ok(step)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/step.rs"]
mod tests;
