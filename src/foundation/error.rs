/// Convenience result type used across posecard.
pub type PosecardResult<T> = Result<T, PosecardError>;

/// Top-level error taxonomy used by compositor APIs.
///
/// Per-image load failures are not part of this enum: they are reported as
/// [`crate::LoadError`] and recovered locally by the composers.
#[derive(thiserror::Error, Debug)]
pub enum PosecardError {
    /// Invalid caller-provided data or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// A drawing surface could not be obtained for the requested canvas.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Serializing the canvas or handing it to the download sink failed.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosecardError {
    /// Build a [`PosecardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PosecardError::SurfaceUnavailable`] value.
    pub fn surface_unavailable(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }

    /// Build a [`PosecardError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`PosecardError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
