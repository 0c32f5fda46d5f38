use std::f32::consts::TAU;

use crate::foundation::error::{RetrofxError, RetrofxResult};

/// Normalized loop position in `[0, 1)`.
///
/// Every time-varying term in the engine is a function of `Phase` with an integer number of
/// periods per loop, so the sample at `phase → 1` converges on the sample at `phase = 0` and the
/// frame sequence closes on itself. Frame `n` is never generated: it would duplicate frame `0`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct Phase(f32);

impl Phase {
    /// Phase of the first frame.
    pub const ZERO: Self = Self(0.0);

    /// `frame_index / frame_count`.
    ///
    /// Fails with a validation error when `frame_count == 0` or `frame_index >= frame_count`.
    pub fn of(frame_index: u32, frame_count: u32) -> RetrofxResult<Self> {
        if frame_count == 0 {
            return Err(RetrofxError::validation("frame count must be > 0"));
        }
        if frame_index >= frame_count {
            return Err(RetrofxError::validation(format!(
                "frame index {frame_index} out of range for {frame_count} frames"
            )));
        }
        let p = (f64::from(frame_index) / f64::from(frame_count)) as f32;
        // f64 -> f32 rounding can land exactly on 1.0 for huge counts.
        Ok(Self(if p >= 1.0 { f32::from_bits(0x3F7F_FFFF) } else { p }))
    }

    /// Reduce any finite real into `[0, 1)`; `wrapping(1.0) == Phase::ZERO`.
    ///
    /// Non-finite input maps to zero.
    pub fn wrapping(x: f32) -> Self {
        if !x.is_finite() {
            return Self::ZERO;
        }
        let p = x - x.floor();
        Self(if p >= 1.0 { 0.0 } else { p })
    }

    /// The raw value in `[0, 1)`.
    pub fn value(self) -> f32 {
        self.0
    }

    /// `2π · phase`.
    pub fn radians(self) -> f32 {
        TAU * self.0
    }

    /// `sin(2π · cycles · phase)`.
    pub fn sin_cycles(self, cycles: u32) -> f32 {
        (self.radians() * cycles as f32).sin()
    }

    /// `cos(2π · cycles · phase)`.
    pub fn cos_cycles(self, cycles: u32) -> f32 {
        (self.radians() * cycles as f32).cos()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/phase.rs"]
mod tests;
