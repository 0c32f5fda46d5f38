use serde::{Deserialize, Serialize};

use crate::foundation::math::smoothstep;

/// Sub-region of the frame where a procedural layer is active.
///
/// Coordinates are normalized: `u` grows rightwards, `v` grows downwards, both in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpawnArea {
    /// Whole frame.
    #[default]
    Full,
    /// Lower third.
    Bottom,
    /// Upper third.
    Top,
    /// Left third.
    Left,
    /// Right third.
    Right,
    /// Middle half in both axes.
    Center,
    /// Left half.
    FirstHalf,
    /// Right half.
    SecondHalf,
    /// Band along all four borders.
    Edges,
    /// Four corner squares.
    Corners,
}

const THIRD: f32 = 1.0 / 3.0;
const EDGE_BAND: f32 = 0.15;
const CORNER: f32 = 0.25;

/// Axis-aligned normalized rectangle `[u0, u1] x [v0, v1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Region {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl Region {
    const fn new(u0: f32, v0: f32, u1: f32, v1: f32) -> Self {
        Self { u0, v0, u1, v1 }
    }

    pub(crate) fn center(self) -> (f32, f32) {
        ((self.u0 + self.u1) * 0.5, (self.v0 + self.v1) * 0.5)
    }

    /// Soft membership: 1 inside, ramping to 0 over `fade` towards interior sides. Sides lying
    /// on the frame border do not fade.
    fn weight(self, u: f32, v: f32, fade: f32) -> f32 {
        if u < self.u0 || u > self.u1 || v < self.v0 || v > self.v1 {
            return 0.0;
        }
        if fade <= 0.0 {
            return 1.0;
        }
        let mut w: f32 = 1.0;
        if self.u0 > 0.0 {
            w = w.min(smoothstep(0.0, fade, u - self.u0));
        }
        if self.u1 < 1.0 {
            w = w.min(smoothstep(0.0, fade, self.u1 - u));
        }
        if self.v0 > 0.0 {
            w = w.min(smoothstep(0.0, fade, v - self.v0));
        }
        if self.v1 < 1.0 {
            w = w.min(smoothstep(0.0, fade, self.v1 - v));
        }
        w
    }
}

impl SpawnArea {
    /// Bounding region used to anchor emitters.
    pub(crate) fn bounds(self) -> Region {
        match self {
            Self::Full | Self::Edges | Self::Corners => Region::new(0.0, 0.0, 1.0, 1.0),
            Self::Bottom => Region::new(0.0, 1.0 - THIRD, 1.0, 1.0),
            Self::Top => Region::new(0.0, 0.0, 1.0, THIRD),
            Self::Left => Region::new(0.0, 0.0, THIRD, 1.0),
            Self::Right => Region::new(1.0 - THIRD, 0.0, 1.0, 1.0),
            Self::Center => Region::new(0.25, 0.25, 0.75, 0.75),
            Self::FirstHalf => Region::new(0.0, 0.0, 0.5, 1.0),
            Self::SecondHalf => Region::new(0.5, 0.0, 1.0, 1.0),
        }
    }

    /// Mask value in `[0, 1]` at `(u, v)` with a fade band of width `fade`.
    pub(crate) fn weight(self, u: f32, v: f32, fade: f32) -> f32 {
        let fade = fade.clamp(0.0, 0.5);
        match self {
            Self::Edges => {
                let inner = Region::new(EDGE_BAND, EDGE_BAND, 1.0 - EDGE_BAND, 1.0 - EDGE_BAND);
                1.0 - inner.weight(u, v, fade)
            }
            Self::Corners => corner_regions()
                .into_iter()
                .map(|r| r.weight(u, v, fade))
                .fold(0.0, f32::max),
            _ => self.bounds().weight(u, v, fade),
        }
    }

    /// Map three uniform samples to a point inside the area.
    pub(crate) fn sample(self, r1: f32, r2: f32, r3: f32) -> (f32, f32) {
        match self {
            Self::Edges => {
                let along = r1;
                let across = r2 * EDGE_BAND;
                match (r3 * 4.0) as u32 {
                    0 => (along, across),
                    1 => (1.0 - across, along),
                    2 => (along, 1.0 - across),
                    _ => (across, along),
                }
            }
            Self::Corners => {
                let regions = corner_regions();
                let r = regions[((r3 * 4.0) as usize).min(3)];
                (r.u0 + r1 * (r.u1 - r.u0), r.v0 + r2 * (r.v1 - r.v0))
            }
            _ => {
                let r = self.bounds();
                (r.u0 + r1 * (r.u1 - r.u0), r.v0 + r2 * (r.v1 - r.v0))
            }
        }
    }

    /// Index used by the GPU programs.
    #[cfg(feature = "gpu")]
    pub(crate) fn shader_index(self) -> u32 {
        match self {
            Self::Full => 0,
            Self::Bottom => 1,
            Self::Top => 2,
            Self::Left => 3,
            Self::Right => 4,
            Self::Center => 5,
            Self::FirstHalf => 6,
            Self::SecondHalf => 7,
            Self::Edges => 8,
            Self::Corners => 9,
        }
    }
}

fn corner_regions() -> [Region; 4] {
    [
        Region::new(0.0, 0.0, CORNER, CORNER),
        Region::new(1.0 - CORNER, 0.0, 1.0, CORNER),
        Region::new(0.0, 1.0 - CORNER, CORNER, 1.0),
        Region::new(1.0 - CORNER, 1.0 - CORNER, 1.0, 1.0),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/effects/mask.rs"]
mod tests;
