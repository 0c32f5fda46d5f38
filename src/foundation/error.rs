/// Convenience result type used across retrofx.
pub type RetrofxResult<T> = Result<T, RetrofxError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Out-of-range option values never show up here: renderers substitute their documented
/// defaults instead. Cancellation is not an error either, see
/// [`RenderOutcome`](crate::RenderOutcome).
#[derive(thiserror::Error, Debug)]
pub enum RetrofxError {
    /// Invalid caller-provided configuration (frame counts, buffers, kinds, ids, option keys).
    #[error("validation error: {0}")]
    Validation(String),

    /// A renderer failed while producing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// The GPU backend failed (context creation, device loss, readback).
    #[error("backend error: {0}")]
    Backend(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RetrofxError {
    /// Build a [`RetrofxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RetrofxError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`RetrofxError::Backend`] value.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Return `true` when retrying the same request on the CPU backend may succeed.
    pub fn is_backend_failure(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
