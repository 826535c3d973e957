//! Inbetween animates CAD assemblies between captured keyframes.
//!
//! A [`Step`] snapshots the placement, visibility and material of every tracked scene object.
//! An [`Animation`] orders steps and plays them back by blending consecutive pairs:
//!
//! - Capture steps from a live [`Scene`]
//! - Play them interactively at an adaptive rate ([`Animation::play`])
//! - Export them at a fixed rate into a [`FrameSink`], usually an external encoder
//!   ([`Animation::video`])
//!
//! The host (document, viewport, clock) is injected through the traits in [`HostContext`];
//! [`AnimationSession`] owns the per-document state and the workbench commands.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod config;
pub(crate) mod encode;
pub(crate) mod host;
pub(crate) mod session;
pub(crate) mod state;

pub use crate::foundation::clock::{Clock, ManualClock, SystemClock, format_mmss};
pub use crate::foundation::core::{
    Background, DrawStyle, FrameIndex, FrameRGBA, RESOLUTION_PRESETS, Resolution,
};
pub use crate::foundation::error::{InbetweenError, InbetweenResult};

pub use crate::animation::interp::{
    Lerp, MaterialEndpoint, blend_material, blend_transform, lerp,
};
pub use crate::animation::playback::{
    CancelToken, FrameCursor, FrameTick, PlaybackMode, PlaybackReport, PlaybackState,
    progress_samples,
};
pub use crate::animation::sequence::{Animation, RenderReport, STEP_BASE_NAME};
pub use crate::animation::step::{Snapshot, Step, capture_scene};
pub use crate::config::settings::{AdaptiveRate, AnimationSettings, CaptureFilter, Eligibility};
pub use crate::encode::ffmpeg::{
    FfmpegSink, FfmpegSinkOpts, encode_png, ensure_parent_dir, is_encoder_available,
};
pub use crate::encode::gif::{
    gif_path, make_gif, palette_path, palettegen_args, paletteuse_args, run_encoder,
};
pub use crate::encode::renderer::{
    PROGRESS_EVERY, RenderSummary, VideoRenderer, eta_remaining, render_still,
};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::host::memory::{
    HeadlessViewport, LINK_KIND, MemoryObject, MemoryScene, PART_KIND,
};
pub use crate::host::{HostContext, Scene, SceneObject, Viewport};
pub use crate::session::animation_session::{AnimationSession, DocumentId, STILL_FRAME_PATH};
pub use crate::session::command::Command;
pub use crate::session::control::PlaybackControl;
pub use crate::session::example::example_animation;
pub use crate::state::material::Material;
pub use crate::state::object::ObjectState;
pub use crate::state::transform::Transform;
