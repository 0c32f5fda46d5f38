//! Flame field: options, heat ramps and the CPU algorithms.

pub mod cpu;
/// Flame layer options.
pub mod options;
/// Named heat palettes.
pub mod ramp;
