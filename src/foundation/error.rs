/// Convenience result type used across the crate.
pub type PosterResult<T> = Result<T, PosterError>;

/// Composition stage names carried by [`PosterError::Render`] so callers can
/// surface a diagnosable message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderStage {
    /// Background fill or gradient construction.
    Background,
    /// Artwork resize, clipping, or placement.
    ArtworkPlacement,
    /// Title or year text layout and drawing.
    Text,
    /// Star-rating row drawing.
    Stars,
}

impl RenderStage {
    /// Stable lowercase stage name used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::ArtworkPlacement => "artwork-placement",
            Self::Text => "text",
            Self::Stars => "stars",
        }
    }
}

impl std::fmt::Display for RenderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum PosterError {
    /// Input bitmap was malformed, undecodable, or zero-sized.
    #[error("invalid artwork: {0}")]
    InvalidArtwork(String),

    /// A drawing primitive could not execute during the named stage.
    ///
    /// Errors are terminal for the call; no partial output is returned.
    #[error("render failure ({stage}): {message}")]
    Render {
        /// Stage that failed.
        stage: RenderStage,
        /// Human-readable cause.
        message: String,
    },

    /// Invalid user-provided data outside the artwork itself.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosterError {
    /// Build a [`PosterError::InvalidArtwork`] value.
    pub fn invalid_artwork(msg: impl Into<String>) -> Self {
        Self::InvalidArtwork(msg.into())
    }

    /// Build a [`PosterError::Render`] value for the given stage.
    pub fn render(stage: RenderStage, msg: impl Into<String>) -> Self {
        Self::Render {
            stage,
            message: msg.into(),
        }
    }

    /// Build a [`PosterError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
