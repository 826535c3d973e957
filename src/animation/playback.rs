use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Evenly spaced progress values in `[0, 1)`: `ceil(frames)` samples of `i / frames`.
///
/// With `last` an exact `1.0` is appended so the final step is reached precisely.
pub fn progress_samples(frames: f64, last: bool) -> Vec<f64> {
    let frames = if frames.is_finite() && frames >= 1.0 {
        frames
    } else {
        1.0
    };
    // Tolerate float noise such as 24.000000000000004 from fps * secs.
    let count = (frames - 1e-9).ceil().max(1.0) as usize;
    let mut out: Vec<f64> = (0..count)
        .map(|i| i as f64 / frames)
        .filter(|t| *t < 1.0)
        .collect();
    if last {
        out.push(1.0);
    }
    out
}

/// One produced frame: progress `t` of the move from step `step - 1` into `step`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    pub step: usize,
    pub t: f64,
    /// First sample of this step pair.
    pub pair_start: bool,
}

/// Lazily walks consecutive step pairs and their progress samples.
///
/// The sample density (frames per second of step duration) may be changed at any time; it
/// takes effect when the next pair starts. Fixed-rate export never changes it.
#[derive(Clone, Debug)]
pub struct FrameCursor {
    durations: Vec<u32>,
    density: f64,
    step: usize,
    samples: Vec<f64>,
    pos: usize,
}

impl FrameCursor {
    /// `durations[i]` is the duration of step `i`, in seconds.
    pub fn new(durations: Vec<u32>, density: f64) -> Self {
        Self {
            durations,
            density,
            step: 0,
            samples: Vec::new(),
            pos: 0,
        }
    }

    pub fn set_density(&mut self, density: f64) {
        self.density = density;
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Step the cursor is currently moving into (0 before the first tick).
    pub fn step(&self) -> usize {
        self.step
    }

    /// Frames the pair into `step` is split into at the given density.
    ///
    /// `None` for step 0, which no pair moves into, and for steps past the end.
    pub fn pair_frames(&self, step: usize, density: f64) -> Option<f64> {
        let secs = self.durations.get(step.checked_sub(1)?)?;
        Some(f64::from(*secs) * density)
    }
}

impl Iterator for FrameCursor {
    type Item = FrameTick;

    fn next(&mut self) -> Option<FrameTick> {
        let mut pair_start = false;
        while self.pos >= self.samples.len() {
            self.step += 1;
            if self.step >= self.durations.len() {
                self.step = self.durations.len().saturating_sub(1);
                self.samples.clear();
                self.pos = 0;
                return None;
            }
            let last = self.step + 1 == self.durations.len();
            self.samples = progress_samples(self.pair_frames(self.step, self.density)?, last);
            self.pos = 0;
            pair_start = true;
        }
        let t = self.samples[self.pos];
        self.pos += 1;
        Some(FrameTick {
            step: self.step,
            t,
            pair_start,
        })
    }
}

/// Cooperative cancellation flag shared between the frame loop and UI callbacks.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackMode {
    Idle,
    Playing,
    Rendering,
}

/// Process-wide playback status of one session.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackState {
    pub current_step: usize,
    pub playing: bool,
    pub rendering: bool,
    /// Interactive sample density carried over between plays.
    pub adaptive_fps: f64,
}

impl PlaybackState {
    pub fn new(initial_fps: f64) -> Self {
        Self {
            current_step: 0,
            playing: false,
            rendering: false,
            adaptive_fps: initial_fps,
        }
    }

    pub fn mode(&self) -> PlaybackMode {
        if self.rendering {
            PlaybackMode::Rendering
        } else if self.playing {
            PlaybackMode::Playing
        } else {
            PlaybackMode::Idle
        }
    }

    pub fn is_idle(&self) -> bool {
        self.mode() == PlaybackMode::Idle
    }

    pub fn reset(&mut self, initial_fps: f64) {
        *self = Self::new(initial_fps);
    }
}

/// Outcome of one pass over the step pairs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaybackReport {
    pub pairs: usize,
    pub frames: u64,
    pub cancelled: bool,
    pub adaptive_fps: f64,
}

#[cfg(test)]
#[path = "../../tests/unit/animation/playback.rs"]
mod tests;
