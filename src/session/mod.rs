//! Engine facade: backend selection, configuration and the render entry points.

/// Engine and its options.
pub mod engine;
