use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::animation::playback::{CancelToken, PlaybackMode};
use crate::foundation::error::{InbetweenError, InbetweenResult};
use crate::session::command::Command;

/// Cloneable handle for the commands that act on a running loop.
///
/// Host callbacks (toolbar buttons, event filters) keep a clone while
/// [`AnimationSession`](crate::AnimationSession) is borrowed by `play` or a render. The
/// session publishes its mode here for the duration of each loop.
#[derive(Clone, Debug, Default)]
pub struct PlaybackControl {
    cancel: CancelToken,
    playing: Arc<AtomicBool>,
    rendering: Arc<AtomicBool>,
}

impl PlaybackControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub(crate) fn cancel(&self) -> &CancelToken {
        &self.cancel
    }

    /// Mode of the loop currently running, as last published by the session.
    pub fn mode(&self) -> PlaybackMode {
        if self.rendering.load(Ordering::SeqCst) {
            PlaybackMode::Rendering
        } else if self.playing.load(Ordering::SeqCst) {
            PlaybackMode::Playing
        } else {
            PlaybackMode::Idle
        }
    }

    pub(crate) fn enter(&self, mode: PlaybackMode) {
        let rendering = mode == PlaybackMode::Rendering;
        self.playing.store(mode != PlaybackMode::Idle, Ordering::SeqCst);
        self.rendering.store(rendering, Ordering::SeqCst);
    }

    pub(crate) fn leave(&self) {
        self.enter(PlaybackMode::Idle);
    }

    /// Whether `cmd` can be issued through this handle right now.
    ///
    /// Only [`Command::Pause`] and [`Command::AbortRender`] act on a running loop.
    pub fn is_enabled(&self, cmd: Command) -> bool {
        match cmd {
            Command::Pause => self.mode() == PlaybackMode::Playing,
            Command::AbortRender => self.mode() == PlaybackMode::Rendering,
            _ => false,
        }
    }

    /// Stop interactive playback at the next frame boundary.
    pub fn pause(&self) -> InbetweenResult<()> {
        self.request(Command::Pause)
    }

    /// Stop an export at the next frame boundary; the encoder is still finalized.
    pub fn abort_render(&self) -> InbetweenResult<()> {
        self.request(Command::AbortRender)
    }

    fn request(&self, cmd: Command) -> InbetweenResult<()> {
        if !self.is_enabled(cmd) {
            return Err(InbetweenError::validation(format!(
                "'{}' is not available while {:?}",
                cmd.label(),
                self.mode()
            )));
        }
        tracing::info!(command = cmd.label(), "stop requested");
        self.cancel.cancel();
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/control.rs"]
mod tests;
