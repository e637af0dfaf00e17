/// Convenience result type used across pixelpane.
pub type PixelPaneResult<T> = Result<T, PixelPaneError>;

/// Top-level error taxonomy used by canvas, layer and solver APIs.
#[derive(thiserror::Error, Debug)]
pub enum PixelPaneError {
    /// A bitmap was requested with a zero width or height.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// A pixel coordinate fell outside the addressed buffer.
    #[error("out of bounds: {0}")]
    OutOfBounds(String),

    /// A layer index at or beyond the configured layer count.
    #[error("invalid layer index: {index} (layer count {count})")]
    InvalidLayerIndex {
        /// Requested index.
        index: usize,
        /// Number of layers in the canvas.
        count: usize,
    },

    /// Contradictory or unsatisfiable window/resize configuration.
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// Malformed user-provided input (configuration files, CLI values).
    #[error("validation error: {0}")]
    Validation(String),

    /// Misuse of the presentation backend contract.
    #[error("presentation error: {0}")]
    Presentation(String),

    /// Failures while shaping or rasterizing text.
    #[error("text error: {0}")]
    Text(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PixelPaneError {
    /// Build a [`PixelPaneError::InvalidDimension`] value.
    pub fn invalid_dimension(msg: impl Into<String>) -> Self {
        Self::InvalidDimension(msg.into())
    }

    /// Build a [`PixelPaneError::OutOfBounds`] value.
    pub fn out_of_bounds(msg: impl Into<String>) -> Self {
        Self::OutOfBounds(msg.into())
    }

    /// Build a [`PixelPaneError::UnsupportedConfiguration`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedConfiguration(msg.into())
    }

    /// Build a [`PixelPaneError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PixelPaneError::Presentation`] value.
    pub fn presentation(msg: impl Into<String>) -> Self {
        Self::Presentation(msg.into())
    }

    /// Build a [`PixelPaneError::Text`] value.
    pub fn text(msg: impl Into<String>) -> Self {
        Self::Text(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
