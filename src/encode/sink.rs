use crate::foundation::core::{FrameIndex, FrameRGBA};
use crate::foundation::error::{InbetweenError, InbetweenResult};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    /// Playback rate written into the output container.
    pub fps: u32,
}

impl SinkConfig {
    pub fn validate(&self) -> InbetweenResult<()> {
        if self.fps == 0 {
            return Err(InbetweenError::validation("fps must be non-zero"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(InbetweenError::validation(
                "sink width/height must be non-zero",
            ));
        }
        Ok(())
    }
}

/// Sink contract for consuming captured frames in order.
///
/// `push_frame` is called with strictly increasing indices between one `begin` and `end`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> InbetweenResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> InbetweenResult<()>;
    /// Called once after the last frame, including after a cancelled or failed run.
    fn end(&mut self) -> InbetweenResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: usize,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// How many times `end` was called.
    pub fn end_calls(&self) -> usize {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> InbetweenResult<()> {
        cfg.validate()?;
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> InbetweenResult<()> {
        if self.cfg.is_none() {
            return Err(InbetweenError::validation("sink not started"));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> InbetweenResult<()> {
        self.ended += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
