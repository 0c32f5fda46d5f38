use vello_cpu::kurbo::{Affine, Circle, Rect};
use vello_cpu::peniko::Color;

use crate::animation::phase::Phase;
use crate::effects::blend::{composite_overlay_in_place, premultiply, unpremultiply};
use crate::foundation::color::Rgb8;
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::RetrofxResult;
use crate::particles::dither::dither_overlay;
use crate::particles::emission::{Emitter, Particle};
use crate::particles::options::{ParticleColorMode, ParticleOptions, ParticleShape};
use crate::particles::sprite::Sprite;
use crate::render::raster::{premul_bytes_to_image, render_overlay, star};

/// Most particles the CPU path draws per layer.
pub const CPU_PARTICLE_LIMIT: u32 = 300;

/// Below this the particle contributes nothing visible.
const MIN_ALPHA: f32 = 1.0 / 255.0;

/// Width of the soft border of the spawn area, in normalized units.
const AREA_FADE: f32 = 0.1;

/// Draw a particle layer as discrete shapes and composite it onto `src`.
pub(crate) fn apply(
    src: &FrameRGBA,
    opts: &ParticleOptions,
    intensity: f32,
    phase: Phase,
    sprite: Option<&Sprite>,
) -> RetrofxResult<FrameRGBA> {
    let o = opts.sanitized();
    let mut out = src.clone();
    if o.count == 0 || intensity <= 0.0 || src.is_empty() {
        return Ok(out);
    }
    let mut overlay = render_particles(&o, src.width, src.height, phase, sprite)?;
    dither_overlay(&mut overlay, src.width, o.dither_palette, o.dither_intensity);
    composite_overlay_in_place(&mut out, &overlay, o.blend, intensity)?;
    Ok(out)
}

/// Rasterize the particle overlay, premultiplied RGBA8.
pub(crate) fn render_particles(
    opts: &ParticleOptions,
    width: u32,
    height: u32,
    phase: Phase,
    sprite: Option<&Sprite>,
) -> RetrofxResult<Vec<u8>> {
    let particles = visible_particles(opts, width, height, phase, CPU_PARTICLE_LIMIT);
    let sprite_paint = match (opts.shape, sprite) {
        (ParticleShape::Custom, Some(s)) => Some(sprite_paint(s, opts)?),
        _ => None,
    };

    render_overlay(width, height, |ctx| {
        for p in &particles {
            if p.alpha < MIN_ALPHA || p.radius <= 0.0 {
                continue;
            }
            let place = Affine::translate((f64::from(p.x), f64::from(p.y))) * Affine::rotate(f64::from(p.rotation));
            match (&sprite_paint, sprite) {
                (Some(paint), Some(s)) => {
                    let side = f64::from(s.width.max(s.height));
                    let k = 2.0 * f64::from(p.radius) / side;
                    ctx.set_transform(
                        place
                            * Affine::scale(k)
                            * Affine::translate((-f64::from(s.width) * 0.5, -f64::from(s.height) * 0.5)),
                    );
                    ctx.set_paint(paint.clone());
                    ctx.push_opacity_layer(p.alpha);
                    ctx.fill_rect(&Rect::new(0.0, 0.0, f64::from(s.width), f64::from(s.height)));
                    ctx.pop_layer();
                }
                _ => {
                    ctx.set_transform(place);
                    ctx.set_paint(particle_color(p));
                    draw_shape(ctx, opts.shape, f64::from(p.radius));
                }
            }
        }
        Ok(())
    })
}

/// Evaluate up to `limit` particles with their opacity masked by the spawn area, so particles
/// that leave the area fade out. Shared by both backends.
pub(crate) fn visible_particles(
    opts: &ParticleOptions,
    width: u32,
    height: u32,
    phase: Phase,
    limit: u32,
) -> Vec<Particle> {
    let emitter = Emitter::new(opts, width, height);
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    let mut particles = emitter.particles(phase, limit);
    for p in &mut particles {
        p.alpha *= opts.spawn_area.weight(p.x / w, p.y / h, AREA_FADE);
    }
    particles
}

fn particle_color(p: &Particle) -> Color {
    let a = (p.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::from_rgba8(p.color.r, p.color.g, p.color.b, a)
}

fn draw_shape(ctx: &mut vello_cpu::RenderContext, shape: ParticleShape, r: f64) {
    match shape {
        ParticleShape::Circle | ParticleShape::Custom => {
            ctx.fill_path(&vello_cpu::kurbo::Shape::to_path(&Circle::new((0.0, 0.0), r), 0.1));
        }
        ParticleShape::Square => ctx.fill_rect(&Rect::new(-r, -r, r, r)),
        ParticleShape::Star => ctx.fill_path(&star(5, r * 0.45, r)),
        ParticleShape::Sparkle => ctx.fill_path(&star(4, r * 0.18, r * 1.3)),
    }
}

/// Sprite paint for this layer; tinted by `color` in sprite color mode.
fn sprite_paint(sprite: &Sprite, opts: &ParticleOptions) -> RetrofxResult<vello_cpu::Image> {
    if opts.color_mode != ParticleColorMode::Sprite {
        return Ok(sprite.paint.clone());
    }
    let tinted = tint_premul(&sprite.rgba8_premul, opts.color);
    premul_bytes_to_image(&tinted, sprite.width, sprite.height)
}

/// Multiply straight color by `tint`, keeping alpha.
pub(crate) fn tint_premul(bytes: &[u8], tint: Rgb8) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for px in bytes.chunks_exact(4) {
        let [r, g, b, a] = unpremultiply([px[0], px[1], px[2], px[3]]);
        let m = |c: u8, t: u8| ((u16::from(c) * u16::from(t) + 127) / 255) as u8;
        out.extend_from_slice(&premultiply([m(r, tint.r), m(g, tint.g), m(b, tint.b), a]));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/particles/cpu.rs"]
mod tests;
