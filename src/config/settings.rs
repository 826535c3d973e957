use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::core::{Background, Resolution};
use crate::foundation::error::{InbetweenError, InbetweenResult};

/// Output and playback settings of one animation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub output_path: PathBuf,
    /// Encoder executable (an `ffmpeg` build). Rendering is refused while unset.
    pub encoder_path: Option<PathBuf>,
    pub resolution: Resolution,
    /// `WxH` that overrides `resolution` when non-empty.
    pub custom_resolution: Option<String>,
    pub background: Background,
    pub fps: u32,
    /// Extra encoder output arguments, inserted before the output path.
    pub extra_encoder_args: Vec<String>,
    pub adaptive: AdaptiveRate,
    pub capture: CaptureFilter,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("video.mp4"),
            encoder_path: None,
            resolution: Resolution::default(),
            custom_resolution: None,
            background: Background::Current,
            fps: 24,
            extra_encoder_args: Vec::new(),
            adaptive: AdaptiveRate::default(),
            capture: CaptureFilter::default(),
        }
    }
}

impl AnimationSettings {
    pub fn from_path(path: &Path) -> InbetweenResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read settings '{}'", path.display()))?;
        let settings: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse settings '{}'", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> InbetweenResult<()> {
        if self.fps == 0 {
            return Err(InbetweenError::validation("fps must be non-zero"));
        }
        self.effective_resolution()?;
        self.adaptive.validate()
    }

    pub fn effective_resolution(&self) -> InbetweenResult<Resolution> {
        match self.custom_resolution.as_deref().map(str::trim) {
            Some(custom) if !custom.is_empty() => custom.parse(),
            _ => Ok(self.resolution),
        }
    }

    /// Configured encoder executable.
    pub fn encoder(&self) -> InbetweenResult<&Path> {
        match self.encoder_path.as_deref() {
            Some(p) if !p.as_os_str().is_empty() => Ok(p),
            _ => Err(InbetweenError::EncoderNotConfigured),
        }
    }
}

/// Feedback control for interactive playback density.
///
/// Each measurement is `frames / elapsed`, clamped to `[min_fps, max_fps]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdaptiveRate {
    pub initial_fps: f64,
    pub min_fps: f64,
    pub max_fps: Option<f64>,
    /// Pause after every interactive frame; caps the wall-clock rate.
    pub frame_interval_ms: u64,
}

impl Default for AdaptiveRate {
    fn default() -> Self {
        Self {
            initial_fps: 24.0,
            min_fps: 3.0,
            max_fps: None,
            frame_interval_ms: 10,
        }
    }
}

impl AdaptiveRate {
    pub fn validate(&self) -> InbetweenResult<()> {
        if !self.min_fps.is_finite() || self.min_fps <= 0.0 {
            return Err(InbetweenError::validation("adaptive min_fps must be > 0"));
        }
        if let Some(max) = self.max_fps
            && max < self.min_fps
        {
            return Err(InbetweenError::validation(
                "adaptive max_fps must be >= min_fps",
            ));
        }
        if !self.initial_fps.is_finite() || self.initial_fps <= 0.0 {
            return Err(InbetweenError::validation(
                "adaptive initial_fps must be > 0",
            ));
        }
        Ok(())
    }

    pub fn clamp(&self, fps: f64) -> f64 {
        let fps = if fps.is_finite() { fps } else { self.min_fps };
        let fps = fps.max(self.min_fps);
        match self.max_fps {
            Some(max) => fps.min(max),
            None => fps,
        }
    }

    /// Achieved rate after `frames` frames in `elapsed`.
    pub fn measure(&self, frames: u64, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs <= 0.0 {
            return self.clamp(self.initial_fps);
        }
        self.clamp(frames as f64 / secs)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Which scene objects a step snapshot tracks.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptureFilter {
    /// Kinds skipped silently (origin markers, construction geometry).
    pub ignored_kinds: Vec<String>,
    /// Kinds that are captured. Other placed objects are skipped with a warning.
    pub tracked_kinds: Vec<String>,
}

impl Default for CaptureFilter {
    fn default() -> Self {
        Self {
            ignored_kinds: ["App::Origin", "App::Line", "App::Plane"]
                .map(String::from)
                .to_vec(),
            tracked_kinds: ["App::Link", "App::Part"].map(String::from).to_vec(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eligibility {
    Tracked,
    Ignored,
    Untracked,
}

impl CaptureFilter {
    pub fn classify(&self, kind: &str) -> Eligibility {
        if self.ignored_kinds.iter().any(|k| k == kind) {
            Eligibility::Ignored
        } else if self.tracked_kinds.iter().any(|k| k == kind) {
            Eligibility::Tracked
        } else {
            Eligibility::Untracked
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
