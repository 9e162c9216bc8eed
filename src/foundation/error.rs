/// Result type returned by every fallible softras API.
pub type RasterResult<T> = Result<T, RasterError>;

/// Error taxonomy for device construction, draw submission and dispatch.
#[derive(thiserror::Error, Debug)]
pub enum RasterError {
    /// Invalid configuration, buffer data or draw arguments, rejected before any work runs.
    #[error("validation error: {0}")]
    Validation(String),

    /// Render targets that cannot be created for the requested surface.
    #[error("device error: {0}")]
    Device(String),

    /// Worker pool failures: a panicked worker or a pool that is not running.
    #[error("dispatch error: {0}")]
    Dispatch(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RasterError {
    /// Build a [`RasterError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RasterError::Device`] value.
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Build a [`RasterError::Dispatch`] value.
    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::Dispatch(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
