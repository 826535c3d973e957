use std::path::Path;
use std::time::Duration;

use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::clock::{Clock, format_mmss};
use crate::foundation::core::{Background, FrameIndex, Resolution};
use crate::foundation::error::{InbetweenError, InbetweenResult};
use crate::host::Viewport;

/// Frames between two progress reports.
pub const PROGRESS_EVERY: u64 = 10;

/// Time left when `written` of `total` frames took `elapsed`.
pub fn eta_remaining(total: u64, elapsed: Duration, written: u64) -> Duration {
    if written == 0 {
        return Duration::ZERO;
    }
    let secs = elapsed.as_secs_f64();
    let left = total as f64 * secs / written as f64 - secs;
    Duration::from_secs_f64(left.max(0.0))
}

/// What one export produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderSummary {
    pub frames: u64,
    pub elapsed: Duration,
    pub fps: f64,
    /// First error seen while pushing frames or finalizing the encoder.
    pub failure: Option<String>,
    pub last_eta: Option<Duration>,
}

impl RenderSummary {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Captures viewport frames into a [`FrameSink`] and tracks throughput.
pub struct VideoRenderer<'a> {
    sink: &'a mut dyn FrameSink,
    clock: &'a dyn Clock,
    resolution: Resolution,
    background: Background,
    fps: u32,
    started: Option<Duration>,
    count: u64,
    last_eta: Option<Duration>,
    failure: Option<String>,
    summary: Option<RenderSummary>,
}

impl<'a> VideoRenderer<'a> {
    pub fn new(
        sink: &'a mut dyn FrameSink,
        clock: &'a dyn Clock,
        resolution: Resolution,
        background: Background,
        fps: u32,
    ) -> Self {
        Self {
            sink,
            clock,
            resolution,
            background,
            fps,
            started: None,
            count: 0,
            last_eta: None,
            failure: None,
            summary: None,
        }
    }

    pub fn begin(&mut self) -> InbetweenResult<()> {
        self.sink.begin(SinkConfig {
            width: self.resolution.width,
            height: self.resolution.height,
            fps: self.fps,
        })?;
        self.started = Some(self.clock.now());
        tracing::info!(
            resolution = %self.resolution,
            fps = self.fps,
            background = self.background.as_str(),
            "render started"
        );
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.count
    }

    fn elapsed(&self) -> Duration {
        match self.started {
            Some(start) => self.clock.now().saturating_sub(start),
            None => Duration::ZERO,
        }
    }

    /// Capture the current view and push it; `total` is the expected frame count for the ETA.
    pub fn add_frame(&mut self, viewport: &mut dyn Viewport, total: u64) -> InbetweenResult<()> {
        if self.started.is_none() || self.summary.is_some() {
            return Err(InbetweenError::encoder_process("renderer is not running"));
        }
        let pushed = viewport
            .capture_frame(self.resolution, self.background)
            .and_then(|frame| self.sink.push_frame(FrameIndex(self.count), &frame));
        if let Err(e) = pushed {
            if self.failure.is_none() {
                self.failure = Some(e.to_string());
            }
            return Err(e);
        }
        self.count += 1;

        if self.count.is_multiple_of(PROGRESS_EVERY) {
            let eta = eta_remaining(total, self.elapsed(), self.count);
            self.last_eta = Some(eta);
            tracing::info!(frames = self.count, total, "{} remaining", format_mmss(eta));
            viewport.process_events();
        }
        Ok(())
    }

    /// Finalize the sink. Safe to call more than once; later calls return the first summary.
    pub fn end(&mut self) -> RenderSummary {
        if let Some(summary) = &self.summary {
            return summary.clone();
        }
        if self.started.is_some()
            && let Err(e) = self.sink.end()
            && self.failure.is_none()
        {
            self.failure = Some(e.to_string());
        }
        let elapsed = self.elapsed();
        let secs = elapsed.as_secs_f64();
        let fps = if secs > 0.0 {
            self.count as f64 / secs
        } else {
            0.0
        };
        let summary = RenderSummary {
            frames: self.count,
            elapsed,
            fps,
            failure: self.failure.clone(),
            last_eta: self.last_eta,
        };
        match &summary.failure {
            None => tracing::info!(
                "exported {} frames in {} ({:.0} fps)",
                summary.frames,
                format_mmss(elapsed),
                fps
            ),
            Some(err) => tracing::error!(frames = summary.frames, error = %err, "render failed"),
        }
        self.summary = Some(summary.clone());
        summary
    }
}

/// Capture one frame of the view and write it as a PNG.
pub fn render_still(
    viewport: &mut dyn Viewport,
    resolution: Resolution,
    background: Background,
    out_path: &Path,
) -> InbetweenResult<()> {
    let frame = viewport.capture_frame(resolution, background)?;
    frame.validate()?;
    ensure_parent_dir(out_path)?;

    use anyhow::Context as _;
    image::save_buffer_with_format(
        out_path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out_path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/renderer.rs"]
mod tests;
