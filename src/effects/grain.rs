use serde::{Deserialize, Serialize};

use crate::foundation::core::FrameRGBA;
use crate::foundation::error::RetrofxResult;
use crate::foundation::math::hash01;
use crate::layer::kind::OptionValue;
use crate::layer::options::unknown_key;

const GRAIN_SEED: u32 = 0x6A1B_2C3D;

/// Options for the `noise` kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseOptions {
    /// Side of the square pixel block that shares one noise sample.
    pub grain_size: u32,
}

impl Default for NoiseOptions {
    fn default() -> Self {
        Self { grain_size: 1 }
    }
}

impl NoiseOptions {
    pub(crate) fn sanitized(&self) -> Self {
        Self {
            grain_size: self.grain_size.max(1),
        }
    }

    pub(crate) fn set(&mut self, key: &str, value: &OptionValue) -> RetrofxResult<()> {
        match key {
            "grain_size" => self.grain_size = value.as_u32(key)?,
            _ => return Err(unknown_key("noise", key)),
        }
        Ok(())
    }
}

/// Add monochrome uniform noise in `[-50 * intensity, 50 * intensity]`.
pub(crate) fn apply(src: &FrameRGBA, opts: &NoiseOptions, intensity: f32, frame_index: u32) -> FrameRGBA {
    let o = opts.sanitized();
    let magnitude = intensity.clamp(0.0, 1.0) * 50.0;
    let mut out = src.clone();
    if magnitude <= 0.0 {
        return out;
    }
    let seed = GRAIN_SEED ^ frame_index.wrapping_mul(0x9E37_79B9);
    for y in 0..src.height {
        for x in 0..src.width {
            let n = (hash01(seed, x / o.grain_size, y / o.grain_size) * 2.0 - 1.0) * magnitude;
            let i = out.index(x, y);
            for c in &mut out.data[i..i + 3] {
                *c = (f32::from(*c) + n).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/grain.rs"]
mod tests;
