use serde::{Deserialize, Serialize};

use crate::animation::phase::Phase;
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::RetrofxResult;
use crate::layer::kind::OptionValue;
use crate::layer::options::{parse_keyword, unknown_key};

/// Axis along which red and blue are displaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitDirection {
    /// Along x.
    #[default]
    Horizontal,
    /// Along y.
    Vertical,
    /// Along both axes.
    Diagonal,
}

/// Options for the `channel-split` kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelSplitOptions {
    /// Displacement axis.
    pub direction: SplitDirection,
    /// Peak displacement in pixels.
    pub amount: f32,
}

impl Default for ChannelSplitOptions {
    fn default() -> Self {
        Self {
            direction: SplitDirection::Horizontal,
            amount: 6.0,
        }
    }
}

impl ChannelSplitOptions {
    pub(crate) fn sanitized(&self) -> Self {
        Self {
            direction: self.direction,
            amount: if self.amount.is_finite() && self.amount >= 0.0 {
                self.amount
            } else {
                Self::default().amount
            },
        }
    }

    pub(crate) fn set(&mut self, key: &str, value: &OptionValue) -> RetrofxResult<()> {
        match key {
            "direction" => self.direction = parse_keyword(key, value)?,
            "amount" => self.amount = value.as_f32(key)?,
            _ => return Err(unknown_key("channel-split", key)),
        }
        Ok(())
    }
}

/// Re-sample red at `amount * sin(2π phase)` and blue at `-amount * cos(2π phase)`; green and
/// alpha stay put.
pub(crate) fn apply(src: &FrameRGBA, opts: &ChannelSplitOptions, intensity: f32, phase: Phase) -> FrameRGBA {
    let o = opts.sanitized();
    let a = o.amount * intensity.clamp(0.0, 1.0);
    let reach = i64::from(src.width.max(src.height));
    let r_off = ((a * phase.sin_cycles(1)).round() as i64).clamp(-reach, reach);
    let b_off = ((-a * phase.cos_cycles(1)).round() as i64).clamp(-reach, reach);

    let (rx, ry, bx, by) = match o.direction {
        SplitDirection::Horizontal => (r_off, 0, b_off, 0),
        SplitDirection::Vertical => (0, r_off, 0, b_off),
        SplitDirection::Diagonal => (r_off, r_off, b_off, b_off),
    };

    let mut out = src.clone();
    if (rx, ry, bx, by) == (0, 0, 0, 0) {
        return out;
    }
    for y in 0..src.height {
        for x in 0..src.width {
            let (xi, yi) = (i64::from(x), i64::from(y));
            let r = src.sample_clamped(xi - rx, yi - ry)[0];
            let b = src.sample_clamped(xi - bx, yi - by)[2];
            let i = out.index(x, y);
            out.data[i] = r;
            out.data[i + 2] = b;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/channel_split.rs"]
mod tests;
