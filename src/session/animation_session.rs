use std::path::{Path, PathBuf};

use crate::animation::playback::{CancelToken, PlaybackMode, PlaybackReport, PlaybackState};
use crate::animation::sequence::{Animation, RenderReport};
use crate::config::settings::AnimationSettings;
use crate::encode::gif::make_gif;
use crate::encode::renderer::render_still;
use crate::foundation::clock::{Clock, format_mmss};
use crate::foundation::error::{InbetweenError, InbetweenResult};
use crate::host::{HostContext, Scene, Viewport};
use crate::session::command::Command;
use crate::session::control::PlaybackControl;

/// Default still-frame file name.
pub const STILL_FRAME_PATH: &str = "frame.png";

/// Host document identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Owns the animation of the active document and its playback status.
///
/// Every command and host hook goes through this value; there is no global state. The
/// [`PlaybackControl`] handed out by [`AnimationSession::control`] is how event callbacks
/// pause or abort a running loop while the session itself is borrowed by it.
#[derive(Debug)]
pub struct AnimationSession {
    defaults: AnimationSettings,
    document: Option<DocumentId>,
    animation: Option<Animation>,
    playback: PlaybackState,
    control: PlaybackControl,
}

impl AnimationSession {
    /// `defaults` seeds the settings of animations created from now on.
    pub fn new(defaults: AnimationSettings) -> Self {
        let playback = PlaybackState::new(defaults.adaptive.initial_fps);
        Self {
            defaults,
            document: None,
            animation: None,
            playback,
            control: PlaybackControl::new(),
        }
    }

    pub fn document(&self) -> Option<&DocumentId> {
        self.document.as_ref()
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    pub fn animation_mut(&mut self) -> Option<&mut Animation> {
        self.animation.as_mut()
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn current_step(&self) -> usize {
        self.playback.current_step
    }

    /// Handle for pause/abort from event callbacks while a loop runs.
    pub fn control(&self) -> PlaybackControl {
        self.control.clone()
    }

    /// Raw cancellation flag behind [`AnimationSession::control`].
    pub fn cancel_token(&self) -> CancelToken {
        self.control.cancel_token()
    }

    pub fn is_enabled(&self, cmd: Command) -> bool {
        let Some(anim) = &self.animation else {
            return cmd == Command::CreateAnimation && self.document.is_some();
        };
        if cmd.needs_idle() && !self.playback.is_idle() {
            return false;
        }
        let current = self.playback.current_step;
        match cmd {
            Command::CreateAnimation => false,
            Command::FirstStep | Command::PrevStep => current != 0,
            Command::NextStep | Command::LastStep => current + 1 < anim.len(),
            Command::Play
            | Command::AddStep
            | Command::CopyStep
            | Command::UpdateStep
            | Command::RenderFrame => true,
            Command::RemoveStep => anim.len() > 1,
            Command::RenderVideo | Command::RenderGif => anim.settings().encoder().is_ok(),
            Command::Pause => self.playback.playing && !self.playback.rendering,
            Command::AbortRender => self.playback.rendering,
        }
    }

    fn ensure(&self, cmd: Command) -> InbetweenResult<()> {
        if self.is_enabled(cmd) {
            return Ok(());
        }
        if cmd.needs_idle() && !self.playback.is_idle() {
            return Err(InbetweenError::busy(format!(
                "'{}' is unavailable while {:?}",
                cmd.label(),
                self.playback.mode()
            )));
        }
        if matches!(cmd, Command::RenderVideo | Command::RenderGif)
            && let Some(anim) = &self.animation
        {
            anim.settings().encoder()?;
        }
        Err(InbetweenError::validation(format!(
            "'{}' is not available now",
            cmd.label()
        )))
    }

    fn anim(&self) -> InbetweenResult<&Animation> {
        bound(&self.animation)
    }

    fn anim_mut(&mut self) -> InbetweenResult<&mut Animation> {
        self.animation
            .as_mut()
            .ok_or_else(|| InbetweenError::validation("no animation in the active document"))
    }

    fn reset_playback(&mut self) {
        let fps = self
            .animation
            .as_ref()
            .map_or(&self.defaults, Animation::settings)
            .adaptive
            .initial_fps;
        self.control.cancel().reset();
        self.control.leave();
        self.playback.reset(fps);
    }

    pub fn create_animation(&mut self, scene: &dyn Scene) -> InbetweenResult<()> {
        self.ensure(Command::CreateAnimation)?;
        let anim = Animation::new(scene, self.defaults.clone())?;
        tracing::info!(document = ?self.document, "animation created");
        self.animation = Some(anim);
        self.reset_playback();
        Ok(())
    }

    /// Make `index` the current step and show it without animating.
    pub fn select_step(&mut self, index: usize, scene: &mut dyn Scene) -> InbetweenResult<()> {
        let step = self
            .anim()?
            .step(index)
            .ok_or_else(|| InbetweenError::validation(format!("no step at index {index}")))?;
        step.apply_instant(scene);
        self.playback.current_step = index;
        Ok(())
    }

    pub fn first_step(&mut self, scene: &mut dyn Scene) -> InbetweenResult<usize> {
        self.ensure(Command::FirstStep)?;
        self.select_step(0, scene)?;
        Ok(0)
    }

    pub fn prev_step(&mut self, scene: &mut dyn Scene) -> InbetweenResult<usize> {
        self.ensure(Command::PrevStep)?;
        let index = self.playback.current_step - 1;
        self.select_step(index, scene)?;
        Ok(index)
    }

    pub fn next_step(&mut self, scene: &mut dyn Scene) -> InbetweenResult<usize> {
        self.ensure(Command::NextStep)?;
        let index = self.playback.current_step + 1;
        self.select_step(index, scene)?;
        Ok(index)
    }

    pub fn last_step(&mut self, scene: &mut dyn Scene) -> InbetweenResult<usize> {
        self.ensure(Command::LastStep)?;
        let index = self.anim()?.len() - 1;
        self.select_step(index, scene)?;
        Ok(index)
    }

    pub fn play(&mut self, ctx: &mut HostContext<'_>) -> InbetweenResult<PlaybackReport> {
        self.ensure(Command::Play)?;
        let anim = bound(&self.animation)?;
        self.control.enter(PlaybackMode::Playing);
        let result = anim.play(ctx, &mut self.playback, self.control.cancel());
        self.control.leave();
        result
    }

    /// Stop interactive playback at the next frame boundary.
    pub fn pause(&mut self) -> InbetweenResult<()> {
        self.ensure(Command::Pause)?;
        self.control.cancel().cancel();
        Ok(())
    }

    /// Stop an export at the next frame boundary; the encoder is still finalized.
    pub fn abort_render(&mut self) -> InbetweenResult<()> {
        self.ensure(Command::AbortRender)?;
        self.control.cancel().cancel();
        Ok(())
    }

    /// Capture the live scene as a new last step and make it current.
    pub fn add_step(&mut self, scene: &dyn Scene) -> InbetweenResult<usize> {
        self.ensure(Command::AddStep)?;
        let index = self.anim_mut()?.add_step(scene, None)?;
        self.playback.current_step = index;
        Ok(index)
    }

    /// Capture the live scene right after the current step and make it current.
    pub fn copy_step(&mut self, scene: &dyn Scene) -> InbetweenResult<usize> {
        self.ensure(Command::CopyStep)?;
        let current = self.playback.current_step;
        let anim = self.anim_mut()?;
        let before = if current + 1 >= anim.len() {
            None
        } else {
            Some(current + 1)
        };
        let index = anim.add_step(scene, before)?;
        self.playback.current_step = index;
        Ok(index)
    }

    /// Re-capture the current step from the live scene.
    pub fn update_step(&mut self, scene: &dyn Scene) -> InbetweenResult<()> {
        self.ensure(Command::UpdateStep)?;
        let current = self.playback.current_step;
        self.anim_mut()?.update_step(current, scene)
    }

    pub fn remove_step(&mut self) -> InbetweenResult<()> {
        self.ensure(Command::RemoveStep)?;
        let current = self.playback.current_step;
        let anim = self.anim_mut()?;
        let removed = anim.remove_step(current)?;
        let last = anim.len() - 1;
        self.playback.current_step = current.min(last);
        tracing::info!(step = removed.name(), "step removed");
        Ok(())
    }

    pub fn render_video(&mut self, ctx: &mut HostContext<'_>) -> InbetweenResult<RenderReport> {
        self.ensure(Command::RenderVideo)?;
        let anim = bound(&self.animation)?;
        export(anim, ctx, &mut self.playback, &self.control)
    }

    /// Export the video, then convert it to `<stem>.gif`.
    ///
    /// Returns `None` when the export was aborted before the conversion.
    pub fn render_gif(&mut self, ctx: &mut HostContext<'_>) -> InbetweenResult<Option<PathBuf>> {
        self.ensure(Command::RenderGif)?;
        let start = ctx.clock.now();
        let anim = bound(&self.animation)?;
        let report = export(anim, ctx, &mut self.playback, &self.control)?;
        if let Some(failure) = report.summary.failure {
            return Err(InbetweenError::encoder_process(failure));
        }
        if report.playback.cancelled {
            tracing::info!("render aborted; gif skipped");
            return Ok(None);
        }
        let settings = anim.settings();
        let gif = make_gif(settings.encoder()?, &settings.output_path)?;
        tracing::info!("done in {}", format_mmss(ctx.clock.now().saturating_sub(start)));
        Ok(Some(gif))
    }

    /// Write one still image of the current view.
    pub fn render_frame(
        &mut self,
        viewport: &mut dyn Viewport,
        clock: &dyn Clock,
        out_path: &Path,
    ) -> InbetweenResult<()> {
        self.ensure(Command::RenderFrame)?;
        let start = clock.now();
        let settings = self.anim()?.settings();
        render_still(
            viewport,
            settings.effective_resolution()?,
            settings.background,
            out_path,
        )?;
        tracing::info!(
            path = %out_path.display(),
            "done in {}",
            format_mmss(clock.now().saturating_sub(start))
        );
        Ok(())
    }

    /// Selection hook: selecting a step object jumps to it. Returns whether `name` was a step.
    pub fn on_step_selected(&mut self, name: &str, scene: &mut dyn Scene) -> InbetweenResult<bool> {
        let Some(index) = self.animation.as_ref().and_then(|a| a.find_step(name)) else {
            return Ok(false);
        };
        self.select_step(index, scene)?;
        Ok(true)
    }

    /// Document hook: rebind to `id`, restoring its persisted animation if it has one.
    pub fn on_document_activated(
        &mut self,
        id: DocumentId,
        persisted: Option<serde_json::Value>,
    ) -> InbetweenResult<()> {
        if self.document.as_ref() == Some(&id) {
            return Ok(());
        }
        tracing::debug!(document = %id.0, restored = persisted.is_some(), "document activated");
        self.document = Some(id);
        let restored = persisted.map(Animation::from_document).transpose();
        let result = match restored {
            Ok(anim) => {
                self.animation = anim;
                Ok(())
            }
            Err(e) => {
                self.animation = None;
                Err(e)
            }
        };
        self.reset_playback();
        result
    }

    /// Document hook: forget everything bound to a closed document.
    pub fn on_document_deleted(&mut self, id: &DocumentId) {
        if self.document.as_ref() != Some(id) {
            return;
        }
        tracing::debug!(document = %id.0, "document closed");
        self.document = None;
        self.animation = None;
        self.reset_playback();
    }

    /// Persistable form of the current animation.
    pub fn persist(&self) -> InbetweenResult<Option<serde_json::Value>> {
        self.animation.as_ref().map(Animation::to_document).transpose()
    }
}

fn bound(animation: &Option<Animation>) -> InbetweenResult<&Animation> {
    animation
        .as_ref()
        .ok_or_else(|| InbetweenError::validation("no animation in the active document"))
}

fn export(
    anim: &Animation,
    ctx: &mut HostContext<'_>,
    playback: &mut PlaybackState,
    control: &PlaybackControl,
) -> InbetweenResult<RenderReport> {
    control.enter(PlaybackMode::Rendering);
    let result = anim.video(ctx, playback, control.cancel());
    control.leave();
    result
}

impl Default for AnimationSession {
    fn default() -> Self {
        Self::new(AnimationSettings::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/animation_session.rs"]
mod tests;
