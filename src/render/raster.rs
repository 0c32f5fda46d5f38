//! Thin helpers around `vello_cpu` shared by the CPU particle and flame renderers.

use std::sync::Arc;

use vello_cpu::kurbo::{Affine, BezPath, Point};

use crate::foundation::error::{RetrofxError, RetrofxResult};

/// Rasterize into a fresh transparent surface and return its premultiplied RGBA8 bytes.
pub(crate) fn render_overlay(
    width: u32,
    height: u32,
    draw: impl FnOnce(&mut vello_cpu::RenderContext) -> RetrofxResult<()>,
) -> RetrofxResult<Vec<u8>> {
    let (w, h) = surface_dims(width, height)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
    ctx.set_paint_transform(Affine::IDENTITY);
    draw(&mut ctx)?;
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

fn surface_dims(width: u32, height: u32) -> RetrofxResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| RetrofxError::render("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| RetrofxError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

/// Wrap premultiplied bytes as a `vello_cpu` image paint.
pub(crate) fn premul_bytes_to_image(bytes: &[u8], width: u32, height: u32) -> RetrofxResult<vello_cpu::Image> {
    let (w, h) = surface_dims(width, height)?;
    if bytes.len() != (width as usize).saturating_mul(height as usize).saturating_mul(4) {
        return Err(RetrofxError::render("pixmap byte len mismatch"));
    }
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Build an image paint from a straight-alpha pixel function.
///
/// Used for ramp gradients: rows or columns of the closure's output line up with user space
/// because shapes are drawn with an identity paint transform.
pub(crate) fn straight_image(
    width: u32,
    height: u32,
    px: impl Fn(u32, u32) -> [u8; 4],
) -> RetrofxResult<vello_cpu::Image> {
    let mut bytes = Vec::with_capacity((width as usize) * (height as usize) * 4);
    for y in 0..height {
        for x in 0..width {
            bytes.extend_from_slice(&crate::effects::blend::premultiply(px(x, y)));
        }
    }
    premul_bytes_to_image(&bytes, width, height)
}

/// Closed polygon through `points`.
pub(crate) fn polygon(points: &[(f64, f64)]) -> BezPath {
    let mut p = BezPath::new();
    let mut it = points.iter();
    if let Some(&(x, y)) = it.next() {
        p.move_to(Point::new(x, y));
        for &(x, y) in it {
            p.line_to(Point::new(x, y));
        }
        p.close_path();
    }
    p
}

/// Star with `points` tips between `inner` and `outer` radius, centered on the origin.
pub(crate) fn star(points: u32, inner: f64, outer: f64) -> BezPath {
    let n = points.max(2) * 2;
    let verts: Vec<(f64, f64)> = (0..n)
        .map(|k| {
            let a = std::f64::consts::TAU * f64::from(k) / f64::from(n) - std::f64::consts::FRAC_PI_2;
            let r = if k % 2 == 0 { outer } else { inner };
            (a.cos() * r, a.sin() * r)
        })
        .collect();
    polygon(&verts)
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
