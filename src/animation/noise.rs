//! Deterministic 2D noise primitives.
//!
//! Nothing here carries state: every function is a pure function of its coordinates and seed,
//! which is what lets a preview and a full-resolution export agree. Time never enters as a
//! free variable; callers animate noise by walking a circle in noise space
//! ([`looped_fbm`]), so one trip around the circle is exactly one loop.

use crate::animation::phase::Phase;
use crate::foundation::math::{hash3, lerp};

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lattice_gradient(seed: u32, ix: i32, iy: i32) -> (f32, f32) {
    let h = hash3(seed, ix as u32, iy as u32);
    // 16 evenly spaced unit directions.
    let a = (h & 15) as f32 * (std::f32::consts::TAU / 16.0);
    (a.cos(), a.sin())
}

/// Perlin-style gradient noise, roughly in `[-1, 1]`, zero at lattice points.
pub fn gradient2(x: f32, y: f32, seed: u32) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let ix = x0 as i32;
    let iy = y0 as i32;
    let fx = x - x0;
    let fy = y - y0;

    let dot = |cx: i32, cy: i32, dx: f32, dy: f32| -> f32 {
        let (gx, gy) = lattice_gradient(seed, ix + cx, iy + cy);
        gx * dx + gy * dy
    };
    let n00 = dot(0, 0, fx, fy);
    let n10 = dot(1, 0, fx - 1.0, fy);
    let n01 = dot(0, 1, fx, fy - 1.0);
    let n11 = dot(1, 1, fx - 1.0, fy - 1.0);

    let u = fade(fx);
    let v = fade(fy);
    // Scale so typical output spans [-1, 1].
    (lerp(lerp(n00, n10, u), lerp(n01, n11, u), v) * 1.414).clamp(-1.0, 1.0)
}

/// Fractal sum of [`gradient2`] octaves, normalized back to roughly `[-1, 1]`.
pub fn fbm2(x: f32, y: f32, octaves: u32, seed: u32) -> f32 {
    let octaves = octaves.clamp(1, 8);
    let mut sum = 0.0;
    let mut amp = 1.0;
    let mut norm = 0.0;
    let mut freq = 1.0;
    for o in 0..octaves {
        sum += amp * gradient2(x * freq, y * freq, seed.wrapping_add(o * 1013));
        norm += amp;
        amp *= 0.5;
        freq *= 2.0;
    }
    sum / norm
}

/// Loop-periodic fBm: samples [`fbm2`] at `(x, y)` displaced around a circle of `radius`
/// whose angle advances `cycles` full turns per loop.
///
/// `looped_fbm(.., Phase::wrapping(1.0), ..)` equals the value at `Phase::ZERO`, and the
/// function is continuous in between.
pub fn looped_fbm(
    x: f32,
    y: f32,
    phase: Phase,
    cycles: u32,
    radius: f32,
    octaves: u32,
    seed: u32,
) -> f32 {
    let a = phase.radians() * cycles.max(1) as f32;
    fbm2(x + radius * a.cos(), y + radius * a.sin(), octaves, seed)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/noise.rs"]
mod tests;
