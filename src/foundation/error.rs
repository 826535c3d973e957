/// Convenience result type used across the crate.
pub type InbetweenResult<T> = Result<T, InbetweenError>;

/// Error taxonomy of capture, playback and export.
#[derive(thiserror::Error, Debug)]
pub enum InbetweenError {
    /// A placement could not be read as exactly 16 matrix components.
    #[error("malformed transform: {0}")]
    MalformedTransform(String),

    /// A render was requested with no encoder executable set.
    #[error("encoder not configured: set the encoder executable path before rendering")]
    EncoderNotConfigured,

    /// The encoder process failed to start, accept frames or exit cleanly.
    #[error("encoder process error: {0}")]
    EncoderProcess(String),

    /// Invalid settings, indices or command preconditions.
    #[error("validation error: {0}")]
    Validation(String),

    /// The host refused or failed an operation (viewport capture, file IO).
    #[error("host error: {0}")]
    Host(String),

    /// Errors when serializing or deserializing persisted animations.
    #[error("serialization error: {0}")]
    Serde(String),

    /// A command that needs an idle session was issued during playback or export.
    #[error("busy: {0}")]
    Busy(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InbetweenError {
    /// Build a [`InbetweenError::MalformedTransform`] value.
    pub fn malformed_transform(msg: impl Into<String>) -> Self {
        Self::MalformedTransform(msg.into())
    }

    /// Build a [`InbetweenError::EncoderProcess`] value.
    pub fn encoder_process(msg: impl Into<String>) -> Self {
        Self::EncoderProcess(msg.into())
    }

    /// Build a [`InbetweenError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`InbetweenError::Host`] value.
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// Build a [`InbetweenError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`InbetweenError::Busy`] value.
    pub fn busy(msg: impl Into<String>) -> Self {
        Self::Busy(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
