pub(crate) mod clock;
pub(crate) mod core;
pub(crate) mod error;
