//! Buffers, colors, errors and small numeric helpers shared by every renderer.

/// Color parsing and conversion.
pub mod color;
/// Pixel buffers, output frames and frame rate.
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod math;
