//! CPU flame algorithms.
//!
//! Every time-varying term is `sin`/`cos` of an integer multiple of `2π * phase * speed`, or
//! noise sampled on a circle in noise space, so all six close the loop.

use std::f64::consts::{PI as PI64, TAU as TAU64};
use std::f32::consts::{PI, TAU};

use vello_cpu::kurbo::{Circle, Rect, Shape};
use vello_cpu::peniko::Color;

use crate::animation::noise::looped_fbm;
use crate::animation::phase::Phase;
use crate::effects::blend::{BlendMode, composite_overlay_in_place, premultiply};
use crate::flames::options::{FlameAlgorithm, FlameOptions};
use crate::flames::ramp::HeatRamp;
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::RetrofxResult;
use crate::foundation::math::{fract, hash01, hash3};
use crate::render::raster::{polygon, render_overlay, straight_image};

const SPARK_SEED: u32 = 0x5EA2_4B11;

/// Synthesize one flame layer and composite it onto `src`.
pub(crate) fn apply(src: &FrameRGBA, opts: &FlameOptions, intensity: f32, phase: Phase) -> RetrofxResult<FrameRGBA> {
    let o = opts.sanitized();
    let mut out = src.clone();
    if intensity <= 0.0 || src.is_empty() {
        return Ok(out);
    }
    let (overlay, mode) = render_flames(&o, src.width, src.height, phase)?;
    composite_overlay_in_place(&mut out, &overlay, mode, intensity)?;
    Ok(out)
}

/// Premultiplied overlay for `opts.algorithm` plus the blend mode it composites with.
pub(crate) fn render_flames(
    opts: &FlameOptions,
    width: u32,
    height: u32,
    phase: Phase,
) -> RetrofxResult<(Vec<u8>, BlendMode)> {
    let f = Field::new(opts, width, height, phase);
    Ok(match opts.algorithm {
        FlameAlgorithm::Classic => (classic(&f)?, BlendMode::Additive),
        FlameAlgorithm::Realistic => (realistic(&f)?, BlendMode::Screen),
        FlameAlgorithm::Plasma => (plasma(&f), BlendMode::Additive),
        FlameAlgorithm::Dragon => (dragon(&f)?, BlendMode::Screen),
        FlameAlgorithm::Wispy => (wispy(&f), BlendMode::Additive),
        FlameAlgorithm::Inferno => (inferno(&f)?, BlendMode::Additive),
    })
}

/// Per-call constants shared by the algorithms.
struct Field<'a> {
    o: &'a FlameOptions,
    ramp: HeatRamp,
    w: u32,
    h: u32,
    wf: f64,
    hf: f64,
    /// Flame height in pixels.
    max_h: f64,
    /// `2π * phase * speed`.
    tau: f64,
    phase: Phase,
}

impl<'a> Field<'a> {
    fn new(o: &'a FlameOptions, w: u32, h: u32, phase: Phase) -> Self {
        let hf = f64::from(h);
        Self {
            o,
            ramp: HeatRamp::new(o.color),
            w,
            h,
            wf: f64::from(w),
            hf,
            max_h: (f64::from(o.height) * hf).max(1.0),
            tau: f64::from(phase.radians()) * f64::from(o.speed),
            phase,
        }
    }

    /// Heat from height above the bottom edge alone: 1 at the base, 0 at the flame top.
    fn base_heat(&self, y: f64) -> f32 {
        (1.0 - (self.hf - y) / self.max_h).clamp(0.0, 1.0) as f32
    }

    /// Full-frame vertical ramp image, heat scaled by `gain`.
    fn vertical_ramp(&self, gain: f32) -> RetrofxResult<vello_cpu::Image> {
        let rows: Vec<[u8; 4]> = (0..self.h)
            .map(|y| self.ramp.rgba(self.base_heat(f64::from(y) + 0.5) * gain))
            .collect();
        straight_image(self.w, self.h, |_, y| rows[y as usize])
    }

    fn color(&self, heat: f32, alpha: f32) -> Color {
        let c = self.ramp.color(heat);
        Color::from_rgba8(c.r, c.g, c.b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

/// Tapered wavy column from the bottom edge; returns the outline polygon.
fn column(xc: f64, half_w: f64, height: f64, bottom: f64, sway: impl Fn(f64) -> f64) -> Vec<(f64, f64)> {
    const STEPS: usize = 10;
    let mut left = Vec::with_capacity(STEPS + 1);
    let mut right = Vec::with_capacity(STEPS + 1);
    for k in 0..=STEPS {
        let t = k as f64 / STEPS as f64;
        let y = if k == 0 { bottom + 1.0 } else { bottom - t * height };
        let hw = half_w * (1.0 - t).powf(0.7);
        let dx = sway(t);
        left.push((xc - hw + dx, y));
        right.push((xc + hw + dx, y));
    }
    right.reverse();
    left.extend(right);
    left
}

fn classic(f: &Field<'_>) -> RetrofxResult<Vec<u8>> {
    let n = (f.w / 12).clamp(6, 48);
    let col_w = f.wf / f64::from(n);
    let turb = f64::from(f.o.turbulence);
    let scale = f64::from(f.o.scale);
    let paint = f.vertical_ramp(1.0)?;

    render_overlay(f.w, f.h, |ctx| {
        ctx.set_paint(paint);
        for c in 0..n {
            let cf = f64::from(c);
            let r = f64::from(hash01(f.o.seed, c, 1));
            let flicker = 0.85 + 0.15 * (f.tau + cf * 1.3).sin() + 0.08 * (2.0 * f.tau + cf * 0.7).cos();
            let height = f.max_h * (0.6 + 0.4 * r) * flicker;
            let xc = (cf + 0.5) * col_w;
            let pts = column(xc, col_w * 0.8 * scale, height, f.hf, |t| {
                ((f.tau + t * 3.0 + cf * 0.9).sin() + 0.5 * (2.0 * f.tau - t * 5.0 + cf * 1.7).cos())
                    * turb
                    * col_w
                    * 0.5
                    * t
            });
            ctx.fill_path(&polygon(&pts));
        }
        Ok(())
    })
}

fn realistic(f: &Field<'_>) -> RetrofxResult<Vec<u8>> {
    let scale = f.o.scale;
    let cell = ((4.0 * scale).round() as u32).max(2);
    let freq = 0.035 / scale;
    let cols = f.w.div_ceil(cell);
    let rows = f.h.div_ceil(cell);
    let cf = f64::from(cell);

    render_overlay(f.w, f.h, |ctx| {
        let mut glow = Vec::new();
        for gy in 0..rows {
            for gx in 0..cols {
                let cx = (f64::from(gx) + 0.5) * cf;
                let cy = (f64::from(gy) + 0.5) * cf;
                let base = f.base_heat(cy);
                if base <= 0.0 && f.o.turbulence < 0.5 {
                    continue;
                }
                let n = looped_fbm(cx as f32 * freq, cy as f32 * freq, f.phase, f.o.speed, 1.2, 3, f.o.seed);
                let heat = (n * f.o.turbulence * 0.5 + base).clamp(0.0, 1.0);
                if heat < 0.03 {
                    continue;
                }
                let [r, g, b, a] = f.ramp.rgba(heat);
                ctx.set_paint(Color::from_rgba8(r, g, b, a));
                let x0 = f64::from(gx) * cf;
                let y0 = f64::from(gy) * cf;
                ctx.fill_rect(&Rect::new(x0, y0, x0 + cf, y0 + cf));
                if heat > 0.7 {
                    glow.push((cx, cy, heat));
                }
            }
        }
        for (x, y, heat) in glow {
            ctx.set_paint(f.color(1.0, (heat - 0.7) / 0.3 * 0.35));
            ctx.fill_path(&Circle::new((x, y), cf * 1.6).to_path(0.1));
        }
        Ok(())
    })
}

fn plasma(f: &Field<'_>) -> Vec<u8> {
    let lut = f.ramp.lut();
    let k = 1.0 / f.o.scale;
    let tau = f.tau as f32;
    let (cx, cy) = (f.w as f32 * 0.5, f.h as f32);
    let gain = 1.0 + 0.5 * f.o.turbulence;
    let mut out = vec![0u8; (f.w as usize) * (f.h as usize) * 4];

    for y in 0..f.h {
        let yf = y as f32;
        let base = f.base_heat(f64::from(y) + 0.5);
        if base <= 0.0 {
            continue;
        }
        for x in 0..f.w {
            let xf = x as f32;
            let d = ((xf - cx).powi(2) + (yf - cy).powi(2)).sqrt();
            let v = ((xf * 0.06 * k + tau).sin()
                + (yf * 0.08 * k - 2.0 * tau).sin()
                + ((xf + yf) * 0.045 * k + 3.0 * tau).sin()
                + (d * 0.07 * k - tau).sin())
                * 0.25;
            let heat = (base * (0.5 + 0.5 * v) * gain).clamp(0.0, 1.0);
            let px = premultiply(lut[(heat * 255.0).round() as usize]);
            let i = ((y as usize) * (f.w as usize) + (x as usize)) * 4;
            out[i..i + 4].copy_from_slice(&px);
        }
    }
    out
}

fn dragon(f: &Field<'_>) -> RetrofxResult<Vec<u8>> {
    const RIBBONS: u32 = 4;
    const SEGMENTS: u32 = 48;
    let turb = f64::from(f.o.turbulence);
    let scale = f64::from(f.o.scale);
    let wf = f.wf;
    let ramp = f.ramp;
    let columns: Vec<[u8; 4]> = (0..f.w)
        .map(|x| ramp.rgba(0.45 + 0.55 * ((f64::from(x) + 0.5) / wf * PI64).sin() as f32))
        .collect();
    let paint = straight_image(f.w, f.h, |x, _| columns[x as usize])?;

    render_overlay(f.w, f.h, |ctx| {
        ctx.set_paint(paint);
        for r in 0..RIBBONS {
            let rf = f64::from(r);
            let rr = f64::from(hash01(f.o.seed, r, 7));
            let base_y = f.hf - f.max_h * (0.2 + 0.6 * (rf + 0.5) / f64::from(RIBBONS));
            let amp = f.max_h * 0.25 * (0.5 + 0.5 * turb);
            let k = TAU64 * (1.0 + rr) / wf;
            let thick = (4.0 + 6.0 * rr) * scale;
            let mut upper = Vec::with_capacity(SEGMENTS as usize + 1);
            let mut lower = Vec::with_capacity(SEGMENTS as usize + 1);
            for s in 0..=SEGMENTS {
                let x = f64::from(s) / f64::from(SEGMENTS) * wf;
                let y = base_y
                    + (x * k + f.tau + rf * 1.7).sin() * amp
                    + 0.5 * amp * (x * k * 0.5 - 2.0 * f.tau + rf).cos();
                let ht = thick * (0.6 + 0.4 * (x * k * 2.0 + 3.0 * f.tau).sin());
                upper.push((x, y - ht));
                lower.push((x, y + ht));
            }
            lower.reverse();
            upper.extend(lower);
            ctx.push_opacity_layer(0.85);
            ctx.fill_path(&polygon(&upper));
            ctx.pop_layer();
        }
        Ok(())
    })
}

fn wispy(f: &Field<'_>) -> Vec<u8> {
    let count = 40 + (f.o.turbulence * 20.0) as u32;
    let (w, h) = (f.w as usize, f.h as usize);
    let mut acc = vec![0.0f32; w * h * 4];
    let p = f.phase.value() * f.o.speed as f32;

    for k in 0..count {
        let r = |j| hash01(f.o.seed, k, j);
        let t = fract(p + r(1));
        let x = r(2) * f.w as f32 + (TAU * (t + r(3))).sin() * f.w as f32 * 0.04 * f.o.turbulence;
        let y = f.h as f32 - t * f.max_h as f32 * 1.1;
        let radius = (3.0 + 8.0 * r(4)) * f.o.scale * (1.0 - 0.5 * t);
        let alpha = (PI * t).sin() * 0.8;
        if alpha <= 0.0 || radius <= 0.0 {
            continue;
        }
        let c = f.ramp.color(1.0 - t).to_f32();
        let x0 = (x - radius).floor().max(0.0) as usize;
        let x1 = ((x + radius).ceil().max(0.0) as usize).min(w);
        let y0 = (y - radius).floor().max(0.0) as usize;
        let y1 = ((y + radius).ceil().max(0.0) as usize).min(h);
        let inv_r2 = 1.0 / (radius * radius);
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - x;
                let dy = py as f32 + 0.5 - y;
                let d2 = (dx * dx + dy * dy) * inv_r2;
                if d2 >= 1.0 {
                    continue;
                }
                let wgt = (1.0 - d2) * (1.0 - d2) * alpha;
                let i = (py * w + px) * 4;
                acc[i] += c[0] * wgt;
                acc[i + 1] += c[1] * wgt;
                acc[i + 2] += c[2] * wgt;
                acc[i + 3] += wgt;
            }
        }
    }

    acc.chunks_exact(4)
        .flat_map(|a| {
            let alpha = a[3].min(1.0);
            let q = |v: f32| (v.min(alpha) * 255.0).round().clamp(0.0, 255.0) as u8;
            [q(a[0]), q(a[1]), q(a[2]), q(alpha)]
        })
        .collect()
}

fn inferno(f: &Field<'_>) -> RetrofxResult<Vec<u8>> {
    const LAYERS: u32 = 4;
    const SPARKS: u32 = 32;
    const SPARK_COLUMNS: u32 = 24;
    let turb = f64::from(f.o.turbulence);
    let scale = f64::from(f.o.scale);
    let paints: Vec<vello_cpu::Image> = (0..LAYERS)
        .map(|l| f.vertical_ramp(0.55 + 0.15 * l as f32))
        .collect::<RetrofxResult<_>>()?;

    render_overlay(f.w, f.h, |ctx| {
        for (l, paint) in (0..LAYERS).zip(paints) {
            let lf = f64::from(l);
            let depth = 1.0 - lf / f64::from(LAYERS - 1);
            let n = 10 + 6 * l;
            let col_w = f.wf / f64::from(n);
            ctx.set_paint(paint);
            ctx.push_opacity_layer(0.45 + 0.15 * l as f32);
            for c in 0..n {
                let cf = f64::from(c);
                let nv = f64::from(looped_fbm(
                    (cf * 0.61 + lf * 5.3) as f32,
                    (lf * 2.1) as f32,
                    f.phase,
                    f.o.speed,
                    0.9,
                    2,
                    f.o.seed.wrapping_add(l),
                ));
                let height = f.max_h * (0.35 + 0.35 * (1.0 - depth * 0.5)) * (1.0 + nv * turb * 0.6);
                let xc = (cf + 0.5) * col_w;
                let pts = column(xc, col_w * 0.75 * scale, height.max(1.0), f.hf, |t| {
                    (f.tau + cf * 0.8 + lf).sin() * col_w * 0.3 * t * turb
                });
                ctx.fill_path(&polygon(&pts));
            }
            ctx.pop_layer();
        }

        let spark_col_w = f.wf / f64::from(SPARK_COLUMNS);
        let lifetimes = f64::from(f.o.speed) * 2.0;
        for s in 0..SPARKS {
            let col = hash3(f.o.seed ^ SPARK_SEED, s, 11) % SPARK_COLUMNS;
            let r = |j| f64::from(hash01(f.o.seed ^ SPARK_SEED, col, s * 8 + j));
            let t = (f64::from(f.phase.value()) * lifetimes + r(1)).fract();
            let x = (f64::from(col) + 0.5) * spark_col_w
                + (r(2) - 0.5) * spark_col_w
                + (TAU64 * (2.0 * t + r(3))).sin() * 4.0;
            let y = f.hf - f.max_h * (0.3 + t);
            let radius = (1.0 + 1.5 * r(4)) * scale;
            let alpha = (PI64 * t).sin() as f32;
            ctx.set_paint(f.color(0.95, alpha));
            ctx.fill_path(&Circle::new((x, y), radius).to_path(0.1));
        }
        Ok(())
    })
}

#[cfg(test)]
#[path = "../../tests/unit/flames/cpu.rs"]
mod tests;
