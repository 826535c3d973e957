//! Keyframe sequencing: blending primitives, steps, and the playback/export loops.

pub(crate) mod interp;
pub(crate) mod playback;
pub(crate) mod sequence;
pub(crate) mod step;
