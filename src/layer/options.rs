use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::effects::channel_split::ChannelSplitOptions;
use crate::effects::grain::NoiseOptions;
use crate::effects::motion_blur::MotionBlurOptions;
use crate::effects::phosphor::PhosphorOptions;
use crate::effects::scanline::ScanlineOptions;
use crate::effects::tape::TapeGlitchOptions;
use crate::flames::options::FlameOptions;
use crate::foundation::error::{RetrofxError, RetrofxResult};
use crate::layer::kind::{EffectKind, OptionValue};
use crate::particles::options::ParticleOptions;

/// Kind-specific configuration: one variant per [`EffectKind`], each holding only its own fields.
///
/// Serialized internally tagged by `kind`; fields missing from the input take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EffectOptions {
    /// `scanline`.
    Scanline(ScanlineOptions),
    /// `tape-glitch`.
    TapeGlitch(TapeGlitchOptions),
    /// `noise`.
    Noise(NoiseOptions),
    /// `phosphor`.
    Phosphor(PhosphorOptions),
    /// `channel-split`.
    ChannelSplit(ChannelSplitOptions),
    /// `motion-blur`.
    MotionBlur(MotionBlurOptions),
    /// `particles`.
    Particles(ParticleOptions),
    /// `flames`.
    Flames(FlameOptions),
}

impl EffectOptions {
    /// Documented defaults for `kind`.
    pub fn defaults_of(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Scanline => Self::Scanline(ScanlineOptions::default()),
            EffectKind::TapeGlitch => Self::TapeGlitch(TapeGlitchOptions::default()),
            EffectKind::Noise => Self::Noise(NoiseOptions::default()),
            EffectKind::Phosphor => Self::Phosphor(PhosphorOptions::default()),
            EffectKind::ChannelSplit => Self::ChannelSplit(ChannelSplitOptions::default()),
            EffectKind::MotionBlur => Self::MotionBlur(MotionBlurOptions::default()),
            EffectKind::Particles => Self::Particles(ParticleOptions::default()),
            EffectKind::Flames => Self::Flames(FlameOptions::default()),
        }
    }

    /// The kind this variant configures.
    pub fn kind(&self) -> EffectKind {
        match self {
            Self::Scanline(_) => EffectKind::Scanline,
            Self::TapeGlitch(_) => EffectKind::TapeGlitch,
            Self::Noise(_) => EffectKind::Noise,
            Self::Phosphor(_) => EffectKind::Phosphor,
            Self::ChannelSplit(_) => EffectKind::ChannelSplit,
            Self::MotionBlur(_) => EffectKind::MotionBlur,
            Self::Particles(_) => EffectKind::Particles,
            Self::Flames(_) => EffectKind::Flames,
        }
    }

    /// Set one option by key.
    ///
    /// Unknown keys and values of the wrong type are validation errors. Values of the right type
    /// but outside the documented range are stored as given and replaced by defaults at render
    /// time.
    pub fn set(&mut self, key: &str, value: &OptionValue) -> RetrofxResult<()> {
        let key = key.trim();
        match self {
            Self::Scanline(o) => o.set(key, value),
            Self::TapeGlitch(o) => o.set(key, value),
            Self::Noise(o) => o.set(key, value),
            Self::Phosphor(o) => o.set(key, value),
            Self::ChannelSplit(o) => o.set(key, value),
            Self::MotionBlur(o) => o.set(key, value),
            Self::Particles(o) => o.set(key, value),
            Self::Flames(o) => o.set(key, value),
        }
    }
}

pub(crate) fn unknown_key(kind: &str, key: &str) -> RetrofxError {
    RetrofxError::validation(format!("unknown option '{key}' for {kind} layer"))
}

/// Parse a kebab-case keyword into one of the option enums through its serde names.
pub(crate) fn parse_keyword<T: DeserializeOwned>(key: &str, value: &OptionValue) -> RetrofxResult<T> {
    let text = value.as_text(key)?.trim().to_ascii_lowercase().replace('_', "-");
    serde_json::from_value(serde_json::Value::String(text.clone())).map_err(|_| {
        RetrofxError::validation(format!("option '{key}' does not accept '{text}'"))
    })
}

/// Finite and inside `range`, else `default`.
pub(crate) fn in_range_or(v: f32, range: std::ops::RangeInclusive<f32>, default: f32) -> f32 {
    if v.is_finite() && range.contains(&v) { v } else { default }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/options.rs"]
mod tests;
