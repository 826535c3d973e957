use std::{fmt, str::FromStr};

use crate::foundation::error::{InbetweenError, InbetweenResult};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Resolution presets offered by the output settings, 4:3 first, then 16:9.
pub const RESOLUTION_PRESETS: &[&str] = &[
    "320x240",
    "640x480",
    "800x600",
    "960x720",
    "1024x768",
    "1280x960",
    "1400x1050",
    "1440x1080",
    "1600x1200",
    "1920x1440",
    "2048x1536",
    "426x240",
    "640x360",
    "854x480",
    "1280x720",
    "1920x1080",
    "2560x1440",
    "3840x2160",
    "7680x4320",
    "15360x8640",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> InbetweenResult<Self> {
        if width == 0 || height == 0 {
            return Err(InbetweenError::validation(
                "resolution width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn pixel_count(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl FromStr for Resolution {
    type Err = InbetweenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| InbetweenError::validation(format!("resolution '{s}' is not WxH")))?;
        let parse = |v: &str| {
            v.trim().parse::<u32>().map_err(|e| {
                InbetweenError::validation(format!("resolution '{s}' has a bad component: {e}"))
            })
        };
        Self::new(parse(w)?, parse(h)?)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl serde::Serialize for Resolution {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Resolution {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Background used when the viewport is captured into a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Background {
    /// Whatever the viewport is currently showing behind the model.
    #[default]
    Current,
    Black,
    White,
    Transparent,
}

impl Background {
    /// Straight RGBA8 fill for backgrounds that have a fixed color.
    pub fn fill_rgba(self) -> Option<[u8; 4]> {
        match self {
            Self::Current => None,
            Self::Black => Some([0, 0, 0, 255]),
            Self::White => Some([255, 255, 255, 255]),
            Self::Transparent => Some([0, 0, 0, 0]),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::Black => "Black",
            Self::White => "White",
            Self::Transparent => "Transparent",
        }
    }
}

/// Viewport draw styles toggled around playback and export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawStyle {
    /// Shaded faces without edges; cheaper to redraw every frame.
    Shaded,
    /// Shaded faces with edges, the normal modelling style.
    FlatLines,
}

/// One captured viewport image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// Straight-alpha RGBA8, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    pub fn solid(resolution: Resolution, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(resolution.pixel_count() as usize * 4)
            .collect();
        Self {
            width: resolution.width,
            height: resolution.height,
            data,
        }
    }

    pub fn validate(&self) -> InbetweenResult<()> {
        let expected = u64::from(self.width) * u64::from(self.height) * 4;
        if self.data.len() as u64 != expected {
            return Err(InbetweenError::validation(format!(
                "frame data is {} bytes, expected {expected} for {}x{} rgba8",
                self.data.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
