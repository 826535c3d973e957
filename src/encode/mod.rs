//! Video output: frame sinks, the encoder subprocess, and the renderer that feeds them.

/// `ffmpeg`-based sink and the GIF post-processing passes.
pub(crate) mod ffmpeg;
pub(crate) mod gif;
/// Frame capture loop bookkeeping (progress, ETA, summary).
pub(crate) mod renderer;
/// Generic frame sink trait and built-in sinks.
pub(crate) mod sink;
