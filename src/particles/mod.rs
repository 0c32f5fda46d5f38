//! Particle field: closed-form emitters, CPU rasterization, sprites and ordered dithering.

/// CPU particle rasterizer.
pub mod cpu;
/// Palettes and Bayer dithering.
pub mod dither;
/// Emission modes and particle evaluation.
pub mod emission;
/// Particle layer options.
pub mod options;
/// Custom sprite decoding and caching.
pub mod sprite;
