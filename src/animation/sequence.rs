use std::time::Duration;

use crate::animation::playback::{
    CancelToken, FrameCursor, FrameTick, PlaybackReport, PlaybackState,
};
use crate::animation::step::Step;
use crate::config::settings::AnimationSettings;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::renderer::{RenderSummary, VideoRenderer};
use crate::encode::sink::FrameSink;
use crate::foundation::core::DrawStyle;
use crate::foundation::error::{InbetweenError, InbetweenResult};
use crate::host::{HostContext, Scene};

/// Name given to the first step; later steps get a numeric suffix.
pub const STEP_BASE_NAME: &str = "Step";

/// Result of one video export.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderReport {
    pub playback: PlaybackReport,
    pub summary: RenderSummary,
}

/// Ordered keyframes of one document plus their output settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    steps: Vec<Step>,
    settings: AnimationSettings,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct Document {
    settings: AnimationSettings,
    steps: Vec<serde_json::Value>,
}

impl Animation {
    /// New animation seeded with one step captured from `scene`.
    pub fn new(scene: &dyn Scene, settings: AnimationSettings) -> InbetweenResult<Self> {
        settings.validate()?;
        let first = Step::capture(STEP_BASE_NAME, scene, &settings.capture)?;
        Ok(Self {
            steps: vec![first],
            settings,
        })
    }

    pub fn from_steps(steps: Vec<Step>, settings: AnimationSettings) -> InbetweenResult<Self> {
        settings.validate()?;
        if steps.is_empty() {
            return Err(InbetweenError::validation(
                "an animation needs at least one step",
            ));
        }
        for (i, step) in steps.iter().enumerate() {
            if steps[..i].iter().any(|s| s.name() == step.name()) {
                return Err(InbetweenError::validation(format!(
                    "duplicate step name '{}'",
                    step.name()
                )));
            }
        }
        Ok(Self { steps, settings })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn step_mut(&mut self, index: usize) -> Option<&mut Step> {
        self.steps.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut AnimationSettings {
        &mut self.settings
    }

    pub fn find_step(&self, name: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.name() == name)
    }

    /// Display label of the step at `index`.
    pub fn label(index: usize) -> String {
        format!("{STEP_BASE_NAME}{index:03}")
    }

    /// First free name out of `Step`, `Step001`, `Step002`, ...
    fn next_step_name(&self) -> String {
        let taken = |n: &str| self.steps.iter().any(|s| s.name() == n);
        if !taken(STEP_BASE_NAME) {
            return STEP_BASE_NAME.to_string();
        }
        (1..)
            .map(|i| format!("{STEP_BASE_NAME}{i:03}"))
            .find(|n| !taken(n))
            .unwrap_or_else(|| STEP_BASE_NAME.to_string())
    }

    /// Capture `scene` as a new step, appended or inserted before `before`. Returns its index.
    pub fn add_step(&mut self, scene: &dyn Scene, before: Option<usize>) -> InbetweenResult<usize> {
        let index = match before {
            None => self.steps.len(),
            Some(i) if i <= self.steps.len() => i,
            Some(i) => {
                return Err(InbetweenError::validation(format!(
                    "cannot insert before step {i}: only {} steps",
                    self.steps.len()
                )));
            }
        };
        let step = Step::capture(self.next_step_name(), scene, &self.settings.capture)?;
        tracing::info!(step = step.name(), index, objects = step.states().len(), "step added");
        self.steps.insert(index, step);
        Ok(index)
    }

    /// Re-capture the step at `index` from `scene`, keeping its duration.
    pub fn update_step(&mut self, index: usize, scene: &dyn Scene) -> InbetweenResult<()> {
        let filter = self.settings.capture.clone();
        let step = self.steps.get_mut(index).ok_or_else(|| {
            InbetweenError::validation(format!("no step at index {index}"))
        })?;
        step.recapture(scene, &filter)?;
        tracing::info!(step = step.name(), "step updated");
        Ok(())
    }

    /// Remove the step at `index`. The last remaining step cannot be removed.
    pub fn remove_step(&mut self, index: usize) -> InbetweenResult<Step> {
        if index >= self.steps.len() {
            return Err(InbetweenError::validation(format!(
                "no step at index {index}"
            )));
        }
        if self.steps.len() == 1 {
            return Err(InbetweenError::validation(
                "cannot remove the only step of an animation",
            ));
        }
        Ok(self.steps.remove(index))
    }

    pub fn durations(&self) -> Vec<u32> {
        self.steps.iter().map(Step::duration_secs).collect()
    }

    /// Frames of a full export: every step but the last contributes `duration * fps`.
    pub fn total_frames(&self) -> u64 {
        let Some((_, moving)) = self.steps.split_last() else {
            return 0;
        };
        moving
            .iter()
            .map(|s| u64::from(s.duration_secs()) * u64::from(self.settings.fps))
            .sum()
    }

    /// Interactive playback with an adaptive sample density.
    ///
    /// Stops at the first frame boundary after `cancel` is set.
    #[tracing::instrument(skip_all, fields(steps = self.steps.len()))]
    pub fn play(
        &self,
        ctx: &mut HostContext<'_>,
        playback: &mut PlaybackState,
        cancel: &CancelToken,
    ) -> InbetweenResult<PlaybackReport> {
        if !playback.is_idle() {
            return Err(InbetweenError::busy("playback or render already running"));
        }
        let rate = &self.settings.adaptive;
        let interval = rate.frame_interval();
        cancel.reset();
        playback.playing = true;
        playback.current_step = 0;
        ctx.viewport.clear_selection();
        ctx.viewport.set_draw_style(DrawStyle::Shaded);

        let start = ctx.clock.now();
        let mut cursor = FrameCursor::new(self.durations(), playback.adaptive_fps);
        let mut report = PlaybackReport {
            adaptive_fps: playback.adaptive_fps,
            ..PlaybackReport::default()
        };
        while let Some(tick) = cursor.next() {
            self.show_tick(&tick, ctx.scene, playback, &mut report);
            ctx.viewport.process_events();
            ctx.clock.sleep(interval);

            let elapsed = ctx.clock.now().saturating_sub(start);
            let fps = rate.measure(report.frames, elapsed);
            cursor.set_density(fps);
            playback.adaptive_fps = fps;
            report.adaptive_fps = fps;

            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
        }

        ctx.viewport.set_draw_style(DrawStyle::FlatLines);
        playback.playing = false;
        ctx.scene.recompute();
        tracing::info!(
            frames = report.frames,
            cancelled = report.cancelled,
            "{:.0} fps",
            report.adaptive_fps
        );
        Ok(report)
    }

    /// Export to the configured encoder.
    ///
    /// Nothing starts when no encoder is configured.
    pub fn video(
        &self,
        ctx: &mut HostContext<'_>,
        playback: &mut PlaybackState,
        cancel: &CancelToken,
    ) -> InbetweenResult<RenderReport> {
        if !playback.is_idle() {
            return Err(InbetweenError::busy("playback or render already running"));
        }
        let encoder = self.settings.encoder()?;
        let mut opts = FfmpegSinkOpts::new(encoder, &self.settings.output_path);
        opts.extra_args = self.settings.extra_encoder_args.clone();
        let mut sink = FfmpegSink::new(opts);
        self.video_to(ctx, playback, cancel, &mut sink)
    }

    /// Export into any sink at the fixed configured rate.
    ///
    /// The sink is always finalized, including after cancellation or a failed frame. Sink
    /// failures are reported in the summary, not returned as errors.
    #[tracing::instrument(skip_all, fields(steps = self.steps.len(), fps = self.settings.fps))]
    pub fn video_to(
        &self,
        ctx: &mut HostContext<'_>,
        playback: &mut PlaybackState,
        cancel: &CancelToken,
        sink: &mut dyn FrameSink,
    ) -> InbetweenResult<RenderReport> {
        if !playback.is_idle() {
            return Err(InbetweenError::busy("playback or render already running"));
        }
        let resolution = self.settings.effective_resolution()?;
        let fps = self.settings.fps;
        let total = self.total_frames();

        cancel.reset();
        playback.rendering = true;
        playback.playing = true;
        playback.current_step = 0;
        ctx.viewport.clear_selection();
        ctx.viewport.set_draw_style(DrawStyle::Shaded);

        let clock = ctx.clock;
        let mut renderer =
            VideoRenderer::new(sink, clock, resolution, self.settings.background, fps);
        let mut report = PlaybackReport {
            adaptive_fps: f64::from(fps),
            ..PlaybackReport::default()
        };
        let started = renderer.begin();
        if started.is_ok() {
            for tick in FrameCursor::new(self.durations(), f64::from(fps)) {
                self.show_tick(&tick, ctx.scene, playback, &mut report);
                ctx.viewport.process_events();
                if renderer.add_frame(ctx.viewport, total).is_err() {
                    break;
                }
                if cancel.is_cancelled() {
                    report.cancelled = true;
                    break;
                }
            }
        }
        let summary = renderer.end();

        ctx.viewport.set_draw_style(DrawStyle::FlatLines);
        playback.playing = false;
        playback.rendering = false;
        ctx.scene.recompute();
        started?;
        Ok(RenderReport {
            playback: report,
            summary,
        })
    }

    fn show_tick(
        &self,
        tick: &FrameTick,
        scene: &mut dyn Scene,
        playback: &mut PlaybackState,
        report: &mut PlaybackReport,
    ) {
        let (prev, cur) = (&self.steps[tick.step - 1], &self.steps[tick.step]);
        if tick.pair_start {
            playback.current_step = tick.step;
            report.pairs += 1;
            tracing::debug!(from = prev.name(), to = cur.name(), "step pair started");
        }
        cur.blend_frame(prev, tick.t, scene);
        report.frames += 1;
    }

    /// Walk every frame of a fixed-rate export without a viewport.
    ///
    /// `on_frame` sees the scene after each blended frame; an error from it stops the walk.
    pub fn sample_track<F>(
        &self,
        scene: &mut dyn Scene,
        fps: f64,
        mut on_frame: F,
    ) -> InbetweenResult<u64>
    where
        F: FnMut(&FrameTick, &dyn Scene) -> InbetweenResult<()>,
    {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(InbetweenError::validation("fps must be > 0"));
        }
        let mut frames = 0;
        for tick in FrameCursor::new(self.durations(), fps) {
            self.steps[tick.step].blend_frame(&self.steps[tick.step - 1], tick.t, scene);
            on_frame(&tick, &*scene)?;
            frames += 1;
        }
        Ok(frames)
    }

    /// Nominal wall-clock length of the animation at its configured durations.
    pub fn duration(&self) -> Duration {
        let secs: u64 = self.durations()[..self.steps.len().saturating_sub(1)]
            .iter()
            .map(|d| u64::from(*d))
            .sum();
        Duration::from_secs(secs)
    }

    /// Settings plus every step's persisted property.
    pub fn to_document(&self) -> InbetweenResult<serde_json::Value> {
        let doc = Document {
            settings: self.settings.clone(),
            steps: self
                .steps
                .iter()
                .map(Step::to_property)
                .collect::<InbetweenResult<_>>()?,
        };
        serde_json::to_value(doc).map_err(|e| InbetweenError::serde(e.to_string()))
    }

    pub fn from_document(value: serde_json::Value) -> InbetweenResult<Self> {
        let doc: Document =
            serde_json::from_value(value).map_err(|e| InbetweenError::serde(e.to_string()))?;
        let steps = doc
            .steps
            .into_iter()
            .map(Step::from_property)
            .collect::<InbetweenResult<Vec<_>>>()?;
        Self::from_steps(steps, doc.settings)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/sequence.rs"]
mod tests;
