use serde::{Deserialize, Serialize};

use crate::animation::phase::Phase;
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::RetrofxResult;
use crate::foundation::math::lerp;
use crate::layer::kind::OptionValue;
use crate::layer::options::unknown_key;

/// Options for the `phosphor` kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhosphorOptions {
    /// Red/blue multiplier at full intensity.
    pub decay: f32,
    /// Peak green boost at full intensity.
    pub glow: f32,
}

impl Default for PhosphorOptions {
    fn default() -> Self {
        Self {
            decay: 0.85,
            glow: 0.35,
        }
    }
}

impl PhosphorOptions {
    pub(crate) fn sanitized(&self) -> Self {
        let d = Self::default();
        Self {
            decay: if (0.0..=1.0).contains(&self.decay) { self.decay } else { d.decay },
            glow: if self.glow.is_finite() && self.glow >= 0.0 { self.glow } else { d.glow },
        }
    }

    pub(crate) fn set(&mut self, key: &str, value: &OptionValue) -> RetrofxResult<()> {
        match key {
            "decay" => self.decay = value.as_f32(key)?,
            "glow" => self.glow = value.as_f32(key)?,
            _ => return Err(unknown_key("phosphor", key)),
        }
        Ok(())
    }
}

pub(crate) fn apply(src: &FrameRGBA, opts: &PhosphorOptions, intensity: f32, phase: Phase) -> FrameRGBA {
    let o = opts.sanitized();
    let intensity = intensity.clamp(0.0, 1.0);
    let rb = lerp(1.0, o.decay, intensity);
    // Envelope in [0, 1], one pulse per loop.
    let envelope = 0.5 + 0.5 * phase.sin_cycles(1);
    let g = 1.0 + o.glow * intensity * envelope;

    let mut out = src.clone();
    for px in out.data.chunks_exact_mut(4) {
        px[0] = (f32::from(px[0]) * rb).round().clamp(0.0, 255.0) as u8;
        px[1] = (f32::from(px[1]) * g).round().clamp(0.0, 255.0) as u8;
        px[2] = (f32::from(px[2]) * rb).round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/phosphor.rs"]
mod tests;
