use serde::{Deserialize, Serialize};

use crate::effects::blend::BlendMode;
use crate::effects::mask::SpawnArea;
use crate::foundation::error::RetrofxResult;
use crate::layer::kind::OptionValue;
use crate::layer::options::{in_range_or, parse_keyword, unknown_key};
use crate::flames::ramp::FlameColor;

/// Largest accepted flicker cycles per loop; larger values are clamped.
pub const MAX_FLAME_SPEED: u32 = 64;

/// Largest accepted feature size multiplier; larger values are clamped.
pub const MAX_FLAME_SCALE: f32 = 8.0;

/// Flame synthesis technique.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlameAlgorithm {
    /// Wavy column polygons with a vertical gradient.
    #[default]
    Classic,
    /// Grid-sampled noise heat field with glow.
    Realistic,
    /// Average of four sinusoids.
    Plasma,
    /// Serpentine ribbons.
    Dragon,
    /// Soft additive blobs.
    Wispy,
    /// Layered columns with sparks.
    Inferno,
}

/// Direction the flames rise towards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlameDirection {
    /// Towards the top edge.
    #[default]
    Up,
    /// Towards the bottom edge.
    Down,
    /// Towards the left edge.
    Left,
    /// Towards the right edge.
    Right,
}

impl FlameDirection {
    #[cfg(feature = "gpu")]
    pub(crate) fn shader_index(self) -> u32 {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }
}

/// Options for the `flames` kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlameOptions {
    /// Technique.
    pub algorithm: FlameAlgorithm,
    /// Heat ramp color.
    pub color: FlameColor,
    /// Flame height as a fraction of the frame, `(0, 1]`.
    pub height: f32,
    /// Noise influence, `[0, 2]`.
    pub turbulence: f32,
    /// Flicker cycles per loop, clamped to `1..=MAX_FLAME_SPEED`.
    pub speed: u32,
    /// Feature size multiplier, clamped to `MAX_FLAME_SCALE`.
    pub scale: f32,
    /// Noise octaves for the GPU field, `1..=4`.
    pub octaves: u32,
    /// Rise direction (GPU).
    pub direction: FlameDirection,
    /// Active region (GPU).
    pub spawn_area: SpawnArea,
    /// Mask fade band width, `[0, 0.5]` (GPU).
    pub fade: f32,
    /// Post brightness offset, `[-1, 1]` (GPU).
    pub brightness: f32,
    /// Post contrast multiplier, `[0, 3]` (GPU).
    pub contrast: f32,
    /// Compositing rule (GPU).
    pub blend: BlendMode,
    /// Variation seed.
    pub seed: u32,
}

impl Default for FlameOptions {
    fn default() -> Self {
        Self {
            algorithm: FlameAlgorithm::Classic,
            color: FlameColor::Red,
            height: 0.5,
            turbulence: 0.6,
            speed: 1,
            scale: 1.0,
            octaves: 3,
            direction: FlameDirection::Up,
            spawn_area: SpawnArea::Bottom,
            fade: 0.1,
            brightness: 0.0,
            contrast: 1.0,
            blend: BlendMode::Additive,
            seed: 0,
        }
    }
}

impl FlameOptions {
    pub(crate) fn sanitized(&self) -> Self {
        let d = Self::default();
        Self {
            height: if self.height.is_finite() && self.height > 0.0 && self.height <= 1.0 {
                self.height
            } else {
                d.height
            },
            turbulence: in_range_or(self.turbulence, 0.0..=2.0, d.turbulence),
            speed: self.speed.clamp(1, MAX_FLAME_SPEED),
            scale: if self.scale.is_finite() && self.scale > 0.0 {
                self.scale.min(MAX_FLAME_SCALE)
            } else {
                d.scale
            },
            octaves: if (1..=4).contains(&self.octaves) { self.octaves } else { d.octaves },
            fade: in_range_or(self.fade, 0.0..=0.5, d.fade),
            brightness: in_range_or(self.brightness, -1.0..=1.0, d.brightness),
            contrast: in_range_or(self.contrast, 0.0..=3.0, d.contrast),
            ..self.clone()
        }
    }

    pub(crate) fn set(&mut self, key: &str, value: &OptionValue) -> RetrofxResult<()> {
        match key {
            "algorithm" => self.algorithm = parse_keyword(key, value)?,
            "color" => self.color = value.as_text(key)?.parse()?,
            "height" => self.height = value.as_f32(key)?,
            "turbulence" => self.turbulence = value.as_f32(key)?,
            "speed" => self.speed = value.as_u32(key)?,
            "scale" => self.scale = value.as_f32(key)?,
            "octaves" => self.octaves = value.as_u32(key)?,
            "direction" => self.direction = parse_keyword(key, value)?,
            "spawn_area" => self.spawn_area = parse_keyword(key, value)?,
            "fade" => self.fade = value.as_f32(key)?,
            "brightness" => self.brightness = value.as_f32(key)?,
            "contrast" => self.contrast = value.as_f32(key)?,
            "blend" => self.blend = parse_keyword(key, value)?,
            "seed" => self.seed = value.as_u32(key)?,
            _ => return Err(unknown_key("flames", key)),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/flames/options.rs"]
mod tests;
