//! Closed-form particle motion.
//!
//! A particle is never integrated over time. Its state at a phase is computed directly from
//! `(seed, index, generation, life)`, where `life = fract(phase * speed + offset)` and the
//! generation counts rebirths modulo `speed`. At `phase -> 1` the generation wraps back to the
//! one seen at `phase = 0`, so every mode closes the loop.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::animation::phase::Phase;
use crate::foundation::color::{Rgb8, hsv_to_rgb};
use crate::foundation::math::{fract, hash01};
use crate::particles::options::{ParticleColorMode, ParticleOptions};

/// Motion pattern of a particle population.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmissionMode {
    /// Drift upwards with a gentle sway.
    #[default]
    Float,
    /// Explode outwards from the area center.
    Burst,
    /// Ballistic arcs from the bottom of the area.
    Fountain,
    /// Outward spiral around the area center.
    Spiral,
    /// Move inwards from the frame border.
    Edge,
    /// Fast slanted fall from the top.
    Rain,
    /// One shared expanding ring.
    Pulse,
    /// Slow wobbling fall.
    Snow,
    /// Small shrinking sparks rising with jitter.
    Embers,
    /// Growing translucent bubbles rising from below.
    Bubbles,
}

/// Evaluated state of one particle at one phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Center x in pixels.
    pub x: f32,
    /// Center y in pixels.
    pub y: f32,
    /// Velocity in pixels per loop along x.
    pub vx: f32,
    /// Velocity in pixels per loop along y.
    pub vy: f32,
    /// Radius in pixels.
    pub radius: f32,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Fill color.
    pub color: Rgb8,
    /// Shape rotation in radians.
    pub rotation: f32,
}

const OFFSET_STREAM: u32 = 0xFFFF_0000;
const STREAMS: u32 = 16;

// Per-particle random stream slots.
const R_ORIGIN_U: u32 = 0;
const R_ORIGIN_V: u32 = 1;
const R_ORIGIN_PICK: u32 = 2;
const R_A: u32 = 3;
const R_B: u32 = 4;
const R_HUE: u32 = 5;
const R_SAT: u32 = 6;
const R_SIZE: u32 = 7;
const R_C: u32 = 8;
const R_SPIN: u32 = 9;

/// Evaluates particles of one layer for a given frame size.
pub struct Emitter {
    opts: ParticleOptions,
    width: f32,
    height: f32,
}

impl Emitter {
    /// Bind sanitized options to a frame size.
    pub fn new(opts: &ParticleOptions, width: u32, height: u32) -> Self {
        Self {
            opts: opts.sanitized(),
            width: width as f32,
            height: height as f32,
        }
    }

    /// Number of particles evaluated, capped at `limit`.
    pub fn count(&self, limit: u32) -> u32 {
        self.opts.count.min(limit)
    }

    /// All particles at `phase`, at most `limit`.
    pub fn particles(&self, phase: Phase, limit: u32) -> Vec<Particle> {
        (0..self.count(limit)).map(|i| self.particle(i, phase)).collect()
    }

    /// Full state of particle `i`.
    pub fn particle(&self, i: u32, phase: Phase) -> Particle {
        let (life, generation) = self.life(i, phase);
        let (x, y) = self.place(i, generation, life);
        let (vx, vy) = self.velocity_at(i, generation, life);
        let r = |k| self.rand(i, generation, k);

        let radius_scale = match self.opts.mode {
            EmissionMode::Embers => 1.0 - 0.6 * life,
            EmissionMode::Bubbles => 0.6 + 0.8 * life,
            EmissionMode::Rain => 0.6,
            _ => 1.0,
        };
        let base_alpha = match self.opts.mode {
            EmissionMode::Bubbles => 0.6,
            EmissionMode::Snow => 0.9,
            _ => 1.0,
        };
        let fade = if self.opts.fade { (PI * life).sin().max(0.0) } else { 1.0 };
        let spin = if r(R_SPIN) < 0.5 { -1.0 } else { 1.0 };

        Particle {
            x,
            y,
            vx,
            vy,
            radius: self.opts.size * (0.6 + 0.8 * r(R_SIZE)) * radius_scale,
            alpha: base_alpha * fade,
            color: self.color(i, generation, phase),
            rotation: TAU * (r(R_SPIN) + spin * life),
        }
    }

    /// Position of particle `i` at `phase`.
    pub fn position(&self, i: u32, phase: Phase) -> (f32, f32) {
        let (life, generation) = self.life(i, phase);
        self.place(i, generation, life)
    }

    /// Velocity of particle `i` at `phase`, in pixels per loop.
    pub fn velocity(&self, i: u32, phase: Phase) -> (f32, f32) {
        let (life, generation) = self.life(i, phase);
        self.velocity_at(i, generation, life)
    }

    fn life(&self, i: u32, phase: Phase) -> (f32, u32) {
        let cycles = self.opts.speed;
        let offset = match self.opts.mode {
            // All pulse particles share one ring.
            EmissionMode::Pulse => 0.0,
            _ => hash01(self.opts.seed, i, OFFSET_STREAM),
        };
        let local = phase.value() * cycles as f32 + offset;
        let life = fract(local);
        let generation = (local.floor() as u32) % cycles;
        (life, generation)
    }

    fn rand(&self, i: u32, generation: u32, k: u32) -> f32 {
        hash01(self.opts.seed, i, generation.wrapping_mul(STREAMS).wrapping_add(k))
    }

    fn velocity_at(&self, i: u32, generation: u32, life: f32) -> (f32, f32) {
        const H: f32 = 1e-3;
        let (x0, y0) = self.place(i, generation, life - H);
        let (x1, y1) = self.place(i, generation, life + H);
        let per_life = self.opts.speed as f32;
        ((x1 - x0) / (2.0 * H) * per_life, (y1 - y0) / (2.0 * H) * per_life)
    }

    fn place(&self, i: u32, generation: u32, t: f32) -> (f32, f32) {
        let (w, h) = (self.width, self.height);
        let m = w.min(h);
        let r = |k| self.rand(i, generation, k);
        let area = self.opts.spawn_area;
        let (ou, ov) = area.sample(r(R_ORIGIN_U), r(R_ORIGIN_V), r(R_ORIGIN_PICK));
        let (ox, oy) = (ou * w, ov * h);
        let (cu, cv) = area.bounds().center();
        let (cx, cy) = (cu * w, cv * h);

        match self.opts.mode {
            EmissionMode::Float => (
                ox + 0.03 * w * (TAU * (2.0 * t + r(R_A))).sin(),
                oy - t * h * (0.25 + 0.35 * r(R_B)),
            ),
            EmissionMode::Burst => {
                let a = TAU * r(R_A);
                let ease = 1.0 - (1.0 - t) * (1.0 - t);
                let d = m * (0.15 + 0.35 * r(R_B)) * ease;
                (cx + a.cos() * d, cy + a.sin() * d)
            }
            EmissionMode::Fountain => {
                let x0 = cx + (r(R_A) - 0.5) * 0.05 * w;
                let y0 = area.bounds().v1 * h;
                let vx0 = (r(R_B) - 0.5) * 0.5 * w;
                let vy0 = -(0.9 + 0.4 * r(R_C)) * h;
                let g = 2.0 * h;
                (x0 + vx0 * t, y0 + vy0 * t + 0.5 * g * t * t)
            }
            EmissionMode::Spiral => {
                let a = TAU * (r(R_A) + 1.5 * t);
                let d = t * m * (0.3 + 0.15 * r(R_B));
                (cx + a.cos() * d, cy + a.sin() * d)
            }
            EmissionMode::Edge => {
                let along = r(R_B);
                let (bx, by) = match (r(R_A) * 4.0) as u32 {
                    0 => (along * w, 0.0),
                    1 => (w, along * h),
                    2 => (along * w, h),
                    _ => (0.0, along * h),
                };
                let k = t * (0.5 + 0.3 * r(R_C));
                (bx + (w * 0.5 - bx) * k, by + (h * 0.5 - by) * k)
            }
            EmissionMode::Rain => (ox + t * 0.12 * h, -0.05 * h + t * 1.1 * h),
            EmissionMode::Pulse => {
                let n = self.opts.count.max(1) as f32;
                let a = TAU * (i as f32 / n + 0.02 * r(R_A));
                let d = t * m * (0.45 + 0.05 * r(R_B));
                (cx + a.cos() * d, cy + a.sin() * d)
            }
            EmissionMode::Snow => (
                ox + 0.04 * w * (TAU * (t + r(R_A))).sin(),
                -0.05 * h + t * 1.1 * h,
            ),
            EmissionMode::Embers => (
                ox + 0.02 * w * (TAU * (3.0 * t + r(R_A))).sin() + (r(R_B) - 0.5) * 0.15 * w * t,
                oy - t * h * (0.4 + 0.4 * r(R_C)),
            ),
            EmissionMode::Bubbles => (
                ox + 0.05 * w * (TAU * (t + r(R_A))).sin(),
                (area.bounds().v1 + 0.05) * h - t * h * (0.8 + 0.3 * r(R_B)),
            ),
        }
    }

    fn color(&self, i: u32, generation: u32, phase: Phase) -> Rgb8 {
        let r = |k| self.rand(i, generation, k);
        match self.opts.color_mode {
            ParticleColorMode::Fixed | ParticleColorMode::Sprite => self.opts.color,
            ParticleColorMode::Warm => hsv_to_rgb(0.12 * r(R_HUE), 0.85 + 0.15 * r(R_SAT), 1.0),
            ParticleColorMode::Cool => hsv_to_rgb(0.5 + 0.17 * r(R_HUE), 0.6 + 0.3 * r(R_SAT), 1.0),
            ParticleColorMode::Rainbow => hsv_to_rgb(fract(r(R_HUE) + phase.value()), 0.9, 1.0),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/emission.rs"]
mod tests;
