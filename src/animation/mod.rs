//! Loop phase and deterministic noise.

/// Looped noise fields.
pub mod noise;
/// Normalized loop position.
pub mod phase;
