use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{RetrofxError, RetrofxResult};

/// The closed set of effect kinds a layer can have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    /// Darkened horizontal bands.
    Scanline,
    /// VHS-style wave shift, chroma bleed and tracking noise.
    TapeGlitch,
    /// Additive film grain.
    Noise,
    /// Green phosphor channel reweighting.
    Phosphor,
    /// Red/blue channel offset.
    ChannelSplit,
    /// Ghosted copies along a direction.
    MotionBlur,
    /// Particle field.
    Particles,
    /// Flame field.
    Flames,
}

impl EffectKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Scanline,
        Self::TapeGlitch,
        Self::Noise,
        Self::Phosphor,
        Self::ChannelSplit,
        Self::MotionBlur,
        Self::Particles,
        Self::Flames,
    ];

    /// Stable kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scanline => "scanline",
            Self::TapeGlitch => "tape-glitch",
            Self::Noise => "noise",
            Self::Phosphor => "phosphor",
            Self::ChannelSplit => "channel-split",
            Self::MotionBlur => "motion-blur",
            Self::Particles => "particles",
            Self::Flames => "flames",
        }
    }

    /// Whether the layer may be routed to a GPU backend.
    pub fn is_procedural(self) -> bool {
        matches!(self, Self::Particles | Self::Flames)
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectKind {
    type Err = RetrofxError;

    fn from_str(s: &str) -> RetrofxResult<Self> {
        let norm = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == norm)
            .ok_or_else(|| RetrofxError::validation(format!("unknown effect kind '{s}'")))
    }
}

/// A loosely typed option value as received from a UI control.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean toggle.
    Bool(bool),
    /// Integer input.
    Int(i64),
    /// Float input.
    Float(f64),
    /// Enum keyword, color, or base64 payload.
    Text(String),
}

impl OptionValue {
    pub(crate) fn as_f32(&self, key: &str) -> RetrofxResult<f32> {
        match self {
            Self::Int(v) => Ok(*v as f32),
            Self::Float(v) => Ok(*v as f32),
            Self::Text(s) => s.trim().parse::<f32>().map_err(|_| type_error(key, "a number")),
            Self::Bool(_) => Err(type_error(key, "a number")),
        }
    }

    /// Integer view; negative values saturate to 0 so sanitizing can substitute the default.
    pub(crate) fn as_u32(&self, key: &str) -> RetrofxResult<u32> {
        let v = self.as_i64(key)?;
        Ok(u32::try_from(v.max(0)).unwrap_or(u32::MAX))
    }

    pub(crate) fn as_i32(&self, key: &str) -> RetrofxResult<i32> {
        let v = self.as_i64(key)?;
        Ok(v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
    }

    fn as_i64(&self, key: &str) -> RetrofxResult<i64> {
        match self {
            Self::Int(v) => Ok(*v),
            Self::Float(v) if v.is_finite() => Ok(v.round() as i64),
            Self::Float(_) => Ok(0),
            Self::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| type_error(key, "an integer")),
            Self::Bool(_) => Err(type_error(key, "an integer")),
        }
    }

    pub(crate) fn as_bool(&self, key: &str) -> RetrofxResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::Int(v) => Ok(*v != 0),
            Self::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" => Ok(true),
                "false" | "off" | "no" => Ok(false),
                _ => Err(type_error(key, "a boolean")),
            },
            Self::Float(_) => Err(type_error(key, "a boolean")),
        }
    }

    pub(crate) fn as_text(&self, key: &str) -> RetrofxResult<&str> {
        match self {
            Self::Text(s) => Ok(s.as_str()),
            _ => Err(type_error(key, "a string")),
        }
    }
}

fn type_error(key: &str, expected: &str) -> RetrofxError {
    RetrofxError::validation(format!("option '{key}' must be {expected}"))
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/kind.rs"]
mod tests;
