use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::color::{Rgb8, hsv_to_rgb};
use crate::foundation::error::{RetrofxError, RetrofxResult};
use crate::foundation::math::smoothstep;

/// Named or custom flame color.
///
/// Text forms: `red`, `blue`, `green`, `purple`, `rainbow`, `#rrggbb`, `gradient:#rrggbb,#rrggbb`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlameColor {
    /// Classic fire.
    #[default]
    Red,
    /// Gas flame.
    Blue,
    /// Copper-salt green.
    Green,
    /// Violet.
    Purple,
    /// Hue follows heat.
    Rainbow,
    /// Single custom hue, darkened at low heat and whitened at high heat.
    Custom(Rgb8),
    /// Two-color gradient from cool to hot.
    Gradient(Rgb8, Rgb8),
}

impl fmt::Display for FlameColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => f.write_str("red"),
            Self::Blue => f.write_str("blue"),
            Self::Green => f.write_str("green"),
            Self::Purple => f.write_str("purple"),
            Self::Rainbow => f.write_str("rainbow"),
            Self::Custom(c) => f.write_str(&c.to_hex()),
            Self::Gradient(a, b) => write!(f, "gradient:{},{}", a.to_hex(), b.to_hex()),
        }
    }
}

impl FromStr for FlameColor {
    type Err = RetrofxError;

    fn from_str(s: &str) -> RetrofxResult<Self> {
        let t = s.trim().to_ascii_lowercase();
        match t.as_str() {
            "red" => return Ok(Self::Red),
            "blue" => return Ok(Self::Blue),
            "green" => return Ok(Self::Green),
            "purple" => return Ok(Self::Purple),
            "rainbow" => return Ok(Self::Rainbow),
            _ => {}
        }
        if let Some(rest) = t.strip_prefix("gradient:") {
            let (a, b) = rest
                .split_once(',')
                .ok_or_else(|| RetrofxError::validation(format!("flame gradient needs two colors: '{s}'")))?;
            return Ok(Self::Gradient(Rgb8::parse_hex(a)?, Rgb8::parse_hex(b)?));
        }
        let hex = t.strip_prefix("custom:").unwrap_or(&t);
        if hex.starts_with('#') {
            return Ok(Self::Custom(Rgb8::parse_hex(hex)?));
        }
        Err(RetrofxError::validation(format!("unknown flame color '{s}'")))
    }
}

impl Serialize for FlameColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FlameColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

type Stops = [(f32, Rgb8); 5];

const RED: Stops = [
    (0.0, Rgb8::new(0, 0, 0)),
    (0.25, Rgb8::new(128, 0, 0)),
    (0.5, Rgb8::new(230, 40, 0)),
    (0.75, Rgb8::new(255, 150, 20)),
    (1.0, Rgb8::new(255, 240, 180)),
];

const BLUE: Stops = [
    (0.0, Rgb8::new(0, 0, 0)),
    (0.25, Rgb8::new(0, 20, 120)),
    (0.5, Rgb8::new(20, 90, 230)),
    (0.75, Rgb8::new(120, 200, 255)),
    (1.0, Rgb8::new(220, 240, 255)),
];

const GREEN: Stops = [
    (0.0, Rgb8::new(0, 0, 0)),
    (0.25, Rgb8::new(0, 90, 10)),
    (0.5, Rgb8::new(20, 200, 40)),
    (0.75, Rgb8::new(150, 255, 100)),
    (1.0, Rgb8::new(230, 255, 210)),
];

const PURPLE: Stops = [
    (0.0, Rgb8::new(0, 0, 0)),
    (0.25, Rgb8::new(70, 0, 110)),
    (0.5, Rgb8::new(150, 30, 220)),
    (0.75, Rgb8::new(220, 120, 255)),
    (1.0, Rgb8::new(250, 220, 255)),
];

fn sample_stops(stops: &Stops, heat: f32) -> Rgb8 {
    for pair in stops.windows(2) {
        let (h0, c0) = pair[0];
        let (h1, c1) = pair[1];
        if heat <= h1 {
            return c0.mix(c1, (heat - h0) / (h1 - h0));
        }
    }
    stops[stops.len() - 1].1
}

/// Heat to color mapping shared by every flame algorithm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatRamp {
    color: FlameColor,
}

impl HeatRamp {
    /// Ramp for `color`.
    pub fn new(color: FlameColor) -> Self {
        Self { color }
    }

    /// Opaque color at `heat` in `[0, 1]`.
    pub fn color(&self, heat: f32) -> Rgb8 {
        let h = if heat.is_finite() { heat.clamp(0.0, 1.0) } else { 0.0 };
        match self.color {
            FlameColor::Red => sample_stops(&RED, h),
            FlameColor::Blue => sample_stops(&BLUE, h),
            FlameColor::Green => sample_stops(&GREEN, h),
            FlameColor::Purple => sample_stops(&PURPLE, h),
            FlameColor::Rainbow => hsv_to_rgb(0.75 * (1.0 - h), 1.0 - 0.4 * h * h, h.sqrt()),
            FlameColor::Custom(c) => {
                let stops: Stops = [
                    (0.0, Rgb8::new(0, 0, 0)),
                    (0.3, Rgb8::new(0, 0, 0).mix(c, 0.5)),
                    (0.6, c),
                    (0.85, c.mix(Rgb8::WHITE, 0.35)),
                    (1.0, c.mix(Rgb8::WHITE, 0.7)),
                ];
                sample_stops(&stops, h)
            }
            FlameColor::Gradient(a, b) => {
                let lit = a.mix(b, h);
                Rgb8::new(0, 0, 0).mix(lit, smoothstep(0.0, 0.35, h))
            }
        }
    }

    /// Straight RGBA at `heat`; alpha rises quickly from zero so cold regions stay clear.
    pub fn rgba(&self, heat: f32) -> [u8; 4] {
        let c = self.color(heat);
        let h = if heat.is_finite() { heat.clamp(0.0, 1.0) } else { 0.0 };
        let a = (smoothstep(0.0, 0.4, h) * 255.0).round() as u8;
        [c.r, c.g, c.b, a]
    }

    /// 256-entry table of straight RGBA, index = heat * 255.
    pub fn lut(&self) -> Vec<[u8; 4]> {
        (0..256).map(|i| self.rgba(i as f32 / 255.0)).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/flames/ramp.rs"]
mod tests;
