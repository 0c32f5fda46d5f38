use serde::{Deserialize, Serialize};

use crate::effects::blend::BlendMode;
use crate::effects::mask::SpawnArea;
use crate::foundation::color::Rgb8;
use crate::foundation::error::RetrofxResult;
use crate::layer::kind::OptionValue;
use crate::layer::options::{in_range_or, parse_keyword, unknown_key};
use crate::particles::dither::DitherPalette;
use crate::particles::emission::EmissionMode;

/// Hard upper bound on particles per layer.
pub const MAX_PARTICLES: u32 = 500;

/// Largest accepted lifetimes-per-loop; larger values are clamped.
pub const MAX_PARTICLE_SPEED: u32 = 64;

/// Largest accepted nominal radius in pixels; larger values are clamped.
pub const MAX_PARTICLE_SIZE: f32 = 256.0;

/// Drawn shape of each particle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticleShape {
    /// Filled disc.
    #[default]
    Circle,
    /// Five-pointed star.
    Star,
    /// Axis-rotated square.
    Square,
    /// Thin four-pointed glint.
    Sparkle,
    /// User sprite from the `sprite` option; circles when absent or undecodable.
    Custom,
}

impl ParticleShape {
    #[cfg(feature = "gpu")]
    pub(crate) fn shader_index(self) -> u32 {
        match self {
            Self::Circle => 0,
            Self::Star => 1,
            Self::Square => 2,
            Self::Sparkle => 3,
            Self::Custom => 0,
        }
    }
}

/// How particle colors are chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticleColorMode {
    /// The `color` option.
    #[default]
    Fixed,
    /// Reds, oranges and yellows.
    Warm,
    /// Cyans and blues.
    Cool,
    /// Random hue, rotating once per loop.
    Rainbow,
    /// Sprite pixels tinted by `color`.
    Sprite,
}

/// Options for the `particles` kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleOptions {
    /// Number of particles, `0..=500`.
    pub count: u32,
    /// Motion pattern.
    pub mode: EmissionMode,
    /// Shape.
    pub shape: ParticleShape,
    /// Color selection.
    pub color_mode: ParticleColorMode,
    /// Base color.
    pub color: Rgb8,
    /// Nominal radius in pixels.
    pub size: f32,
    /// Particle lifetimes per loop.
    pub speed: u32,
    /// Fade in and out over each lifetime.
    pub fade: bool,
    /// Where emitters are anchored.
    pub spawn_area: SpawnArea,
    /// How the particle overlay merges with the image.
    pub blend: BlendMode,
    /// Optional ordered-dither palette for the overlay.
    pub dither_palette: DitherPalette,
    /// Mix between un-dithered (0) and dithered (1) overlay.
    pub dither_intensity: f32,
    /// Base64 image, optionally a `data:` URL.
    pub sprite: Option<String>,
    /// Variation seed.
    pub seed: u32,
}

impl Default for ParticleOptions {
    fn default() -> Self {
        Self {
            count: 60,
            mode: EmissionMode::Float,
            shape: ParticleShape::Circle,
            color_mode: ParticleColorMode::Fixed,
            color: Rgb8::WHITE,
            size: 3.0,
            speed: 1,
            fade: true,
            spawn_area: SpawnArea::Full,
            blend: BlendMode::Additive,
            dither_palette: DitherPalette::None,
            dither_intensity: 1.0,
            sprite: None,
            seed: 0,
        }
    }
}

impl ParticleOptions {
    pub(crate) fn sanitized(&self) -> Self {
        let d = Self::default();
        Self {
            count: if self.count > MAX_PARTICLES { d.count } else { self.count },
            size: if self.size.is_finite() && self.size > 0.0 {
                self.size.min(MAX_PARTICLE_SIZE)
            } else {
                d.size
            },
            speed: self.speed.clamp(1, MAX_PARTICLE_SPEED),
            dither_intensity: in_range_or(self.dither_intensity, 0.0..=1.0, d.dither_intensity),
            sprite: self.sprite.clone().filter(|s| !s.trim().is_empty()),
            ..self.clone()
        }
    }

    pub(crate) fn set(&mut self, key: &str, value: &OptionValue) -> RetrofxResult<()> {
        match key {
            "count" => self.count = value.as_u32(key)?,
            "mode" => self.mode = parse_keyword(key, value)?,
            "shape" => self.shape = parse_keyword(key, value)?,
            "color_mode" => self.color_mode = parse_keyword(key, value)?,
            "color" => self.color = Rgb8::parse_hex(value.as_text(key)?)?,
            "size" => self.size = value.as_f32(key)?,
            "speed" => self.speed = value.as_u32(key)?,
            "fade" => self.fade = value.as_bool(key)?,
            "spawn_area" => self.spawn_area = parse_keyword(key, value)?,
            "blend" => self.blend = parse_keyword(key, value)?,
            "dither_palette" => self.dither_palette = parse_keyword(key, value)?,
            "dither_intensity" => self.dither_intensity = value.as_f32(key)?,
            "sprite" => {
                let s = value.as_text(key)?;
                self.sprite = if s.trim().is_empty() { None } else { Some(s.to_owned()) };
            }
            "seed" => self.seed = value.as_u32(key)?,
            _ => return Err(unknown_key("particles", key)),
        }
        Ok(())
    }
}
