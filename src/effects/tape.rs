use serde::{Deserialize, Serialize};

use crate::animation::phase::Phase;
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::RetrofxResult;
use crate::foundation::math::{hash01, hash3};
use crate::layer::kind::OptionValue;
use crate::layer::options::unknown_key;

const TRACKING_SEED: u32 = 0x7A9E_11C3;
const SNOW_SEED: u32 = 0x51F1_5EED;

/// Options for the `tape-glitch` kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TapeGlitchOptions {
    /// Peak horizontal wave shift in pixels.
    pub distortion: f32,
    /// Wave frequency in radians per row.
    pub wave_frequency: f32,
    /// Horizontal re-sampling offset of the red channel in pixels.
    pub bleed_red: i32,
    /// Horizontal re-sampling offset of the green channel in pixels.
    pub bleed_green: i32,
    /// Horizontal re-sampling offset of the blue channel in pixels.
    pub bleed_blue: i32,
    /// Rows per tracking-noise band.
    pub line_thickness: u32,
    /// Probability that a band is replaced by noise at full intensity.
    pub tracking_noise: f32,
}

impl Default for TapeGlitchOptions {
    fn default() -> Self {
        Self {
            distortion: 8.0,
            wave_frequency: 0.05,
            bleed_red: 2,
            bleed_green: 0,
            bleed_blue: -2,
            line_thickness: 2,
            tracking_noise: 0.05,
        }
    }
}

impl TapeGlitchOptions {
    pub(crate) fn sanitized(&self) -> Self {
        let d = Self::default();
        Self {
            distortion: if self.distortion.is_finite() && self.distortion >= 0.0 {
                self.distortion
            } else {
                d.distortion
            },
            wave_frequency: if self.wave_frequency.is_finite() && self.wave_frequency > 0.0 {
                self.wave_frequency
            } else {
                d.wave_frequency
            },
            bleed_red: self.bleed_red,
            bleed_green: self.bleed_green,
            bleed_blue: self.bleed_blue,
            line_thickness: if self.line_thickness == 0 {
                d.line_thickness
            } else {
                self.line_thickness
            },
            tracking_noise: if (0.0..=1.0).contains(&self.tracking_noise) {
                self.tracking_noise
            } else {
                d.tracking_noise
            },
        }
    }

    pub(crate) fn set(&mut self, key: &str, value: &OptionValue) -> RetrofxResult<()> {
        match key {
            "distortion" => self.distortion = value.as_f32(key)?,
            "wave_frequency" => self.wave_frequency = value.as_f32(key)?,
            "bleed_red" => self.bleed_red = value.as_i32(key)?,
            "bleed_green" => self.bleed_green = value.as_i32(key)?,
            "bleed_blue" => self.bleed_blue = value.as_i32(key)?,
            "line_thickness" => self.line_thickness = value.as_u32(key)?,
            "tracking_noise" => self.tracking_noise = value.as_f32(key)?,
            _ => return Err(unknown_key("tape-glitch", key)),
        }
        Ok(())
    }
}

/// Wave shift, chroma bleed and tracking-noise bands.
///
/// The wave is `sin(y * k + 2π * phase)`, one period per loop. Tracking bands are re-drawn from
/// `frame_index` every frame.
pub(crate) fn apply(
    src: &FrameRGBA,
    opts: &TapeGlitchOptions,
    intensity: f32,
    frame_index: u32,
    phase: Phase,
) -> FrameRGBA {
    let o = opts.sanitized();
    let intensity = intensity.clamp(0.0, 1.0);
    let mut out = src.clone();
    if src.is_empty() {
        return out;
    }

    let bleed = [
        (o.bleed_red as f32 * intensity).round() as i64,
        (o.bleed_green as f32 * intensity).round() as i64,
        (o.bleed_blue as f32 * intensity).round() as i64,
    ];
    let tracking_p = o.tracking_noise * intensity;
    let theta = phase.radians();
    // Any shift past the width samples the clamped edge column anyway.
    let max_shift = i64::from(src.width);

    for y in 0..src.height {
        let band = y / o.line_thickness;
        if tracking_p > 0.0 && hash01(TRACKING_SEED ^ frame_index, band, 0) < tracking_p {
            for x in 0..src.width {
                let l = (hash3(SNOW_SEED ^ frame_index, x, y) >> 24) as u8;
                let a = src.pixel(x, y)[3];
                out.set_pixel(x, y, [l, l, l, a]);
            }
            continue;
        }

        let shift = ((y as f32 * o.wave_frequency + theta).sin() * o.distortion * intensity).round() as i64;
        let shift = shift.clamp(-max_shift, max_shift);
        if shift == 0 && bleed == [0, 0, 0] {
            continue;
        }
        for x in 0..src.width {
            let sx = i64::from(x) - shift;
            let yy = i64::from(y);
            let r = src.sample_clamped(sx - bleed[0], yy)[0];
            let g = src.sample_clamped(sx - bleed[1], yy)[1];
            let b = src.sample_clamped(sx - bleed[2], yy)[2];
            let a = src.sample_clamped(sx, yy)[3];
            out.set_pixel(x, y, [r, g, b, a]);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/tape.rs"]
mod tests;
