use serde::{Deserialize, Serialize};

use crate::animation::phase::Phase;
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::RetrofxResult;
use crate::layer::kind::OptionValue;
use crate::layer::options::{parse_keyword, unknown_key};

/// Number of ghost copies accumulated behind the sharp pass.
pub(crate) const GHOSTS: u32 = 5;

/// Ghost displacement pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlurDirection {
    /// Ghosts offset along x.
    #[default]
    Horizontal,
    /// Ghosts offset along y.
    Vertical,
    /// Ghosts rotated about the center.
    Radial,
    /// Ghosts scaled about the center.
    Zoom,
}

/// Options for the `motion-blur` kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionBlurOptions {
    /// Displacement pattern.
    pub direction: BlurDirection,
    /// Displacement multiplier.
    pub speed: f32,
}

impl Default for MotionBlurOptions {
    fn default() -> Self {
        Self {
            direction: BlurDirection::Horizontal,
            speed: 1.0,
        }
    }
}

impl MotionBlurOptions {
    pub(crate) fn sanitized(&self) -> Self {
        Self {
            direction: self.direction,
            speed: if self.speed.is_finite() && self.speed >= 0.0 {
                self.speed
            } else {
                Self::default().speed
            },
        }
    }

    pub(crate) fn set(&mut self, key: &str, value: &OptionValue) -> RetrofxResult<()> {
        match key {
            "direction" => self.direction = parse_keyword(key, value)?,
            "speed" => self.speed = value.as_f32(key)?,
            _ => return Err(unknown_key("motion-blur", key)),
        }
        Ok(())
    }
}

/// Weighted average of the sharp source (weight 1) and [`GHOSTS`] displaced copies whose
/// weight falls off with distance. Displacement follows `sin(2π phase)`.
pub(crate) fn apply(src: &FrameRGBA, opts: &MotionBlurOptions, intensity: f32, phase: Phase) -> FrameRGBA {
    let o = opts.sanitized();
    let drive = o.speed * intensity.clamp(0.0, 1.0) * phase.sin_cycles(1);
    let mut out = src.clone();
    if src.is_empty() || drive == 0.0 {
        return out;
    }

    let w = src.width as f32;
    let h = src.height as f32;
    let cx = (w - 1.0) * 0.5;
    let cy = (h - 1.0) * 0.5;
    let max_shift = 0.02 * w.max(h) * drive;
    let max_angle = 0.05 * drive;
    let max_zoom = 0.05 * drive;

    // (weight, transform) per ghost; transform maps output coords to source coords.
    let ghosts: Vec<(f32, Ghost)> = (1..=GHOSTS)
        .map(|k| {
            let t = k as f32 / GHOSTS as f32;
            let weight = 0.6 * (1.0 - t) + 0.1;
            let ghost = match o.direction {
                BlurDirection::Horizontal => Ghost::Shift(max_shift * t, 0.0),
                BlurDirection::Vertical => Ghost::Shift(0.0, max_shift * t),
                BlurDirection::Radial => Ghost::Rotate((max_angle * t).sin_cos()),
                BlurDirection::Zoom => Ghost::Scale(1.0 / (1.0 + max_zoom * t).max(0.05)),
            };
            (weight, ghost)
        })
        .collect();
    let total: f32 = 1.0 + ghosts.iter().map(|(w, _)| w).sum::<f32>();

    for y in 0..src.height {
        for x in 0..src.width {
            let sharp = src.pixel(x, y);
            let mut acc = [0.0f32; 4];
            for c in 0..4 {
                acc[c] = f32::from(sharp[c]);
            }
            let (fx, fy) = (x as f32, y as f32);
            for (weight, ghost) in &ghosts {
                let (sx, sy) = match *ghost {
                    Ghost::Shift(dx, dy) => (fx - dx, fy - dy),
                    Ghost::Rotate((sin, cos)) => {
                        let (px, py) = (fx - cx, fy - cy);
                        (cx + px * cos + py * sin, cy - px * sin + py * cos)
                    }
                    Ghost::Scale(inv) => (cx + (fx - cx) * inv, cy + (fy - cy) * inv),
                };
                let p = src.sample_clamped(sx.round() as i64, sy.round() as i64);
                for c in 0..4 {
                    acc[c] += weight * f32::from(p[c]);
                }
            }
            let px: [u8; 4] = std::array::from_fn(|c| (acc[c] / total).round().clamp(0.0, 255.0) as u8);
            out.set_pixel(x, y, px);
        }
    }
    out
}

#[derive(Clone, Copy, Debug)]
enum Ghost {
    Shift(f32, f32),
    Rotate((f32, f32)),
    Scale(f32),
}

#[cfg(test)]
#[path = "../../tests/unit/effects/motion_blur.rs"]
mod tests;
