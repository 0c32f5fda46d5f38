//! Per-pixel effects and the compositing helpers shared with the procedural layers.

pub(crate) mod blend;
/// Red/blue channel offset.
pub mod channel_split;
/// Film grain.
pub mod grain;
/// Spawn-area masks.
pub mod mask;
/// Ghosted motion blur.
pub mod motion_blur;
/// Phosphor channel reweighting.
pub mod phosphor;
/// Darkened scanline bands.
pub mod scanline;
/// VHS tape glitch.
pub mod tape;

pub use blend::BlendMode;
