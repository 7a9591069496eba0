/// Convenience result type used across capclip.
pub type CapclipResult<T> = Result<T, CapclipError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Load and format errors are fatal to the current render/export call and are
/// not retried internally. Audio/playback problems during export start are
/// reported through logging and degrade the pipeline to video-only instead of
/// surfacing here.
#[derive(thiserror::Error, Debug)]
pub enum CapclipError {
    /// A video, image or audio source failed to load or decode.
    #[error("load error: {0}")]
    Load(String),

    /// No acceptable encoder configuration is available on this runtime.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The encoder reported a failure mid-stream or while finalizing.
    #[error("encode error: {0}")]
    Encode(String),

    /// Media playback could not be driven (e.g. the decode process died).
    #[error("playback error: {0}")]
    Playback(String),

    /// Invalid user-provided spec or style data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CapclipError {
    /// Build a [`CapclipError::Load`] value.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build a [`CapclipError::UnsupportedFormat`] value.
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`CapclipError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`CapclipError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build a [`CapclipError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
