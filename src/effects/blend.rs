use serde::{Deserialize, Serialize};

use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{RetrofxError, RetrofxResult};
use crate::foundation::math::mul_div255_u8;

/// Compositing rule used to merge a generated overlay with the buffer beneath it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    /// Source-over.
    Normal,
    /// Saturating add.
    #[default]
    Additive,
    /// `dst * src`.
    Multiply,
    /// `src + dst - src * dst`.
    Screen,
}

impl BlendMode {
    /// Index used by the GPU programs.
    #[cfg(feature = "gpu")]
    pub(crate) fn shader_index(self) -> u32 {
        match self {
            Self::Normal => 0,
            Self::Additive => 1,
            Self::Multiply => 2,
            Self::Screen => 3,
        }
    }
}

pub(crate) type PremulRgba8 = [u8; 4];

pub(crate) fn premultiply(px: [u8; 4]) -> PremulRgba8 {
    let a = u16::from(px[3]);
    [
        mul_div255_u8(u16::from(px[0]), a),
        mul_div255_u8(u16::from(px[1]), a),
        mul_div255_u8(u16::from(px[2]), a),
        px[3],
    ]
}

pub(crate) fn unpremultiply(px: PremulRgba8) -> [u8; 4] {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    if a == 255 {
        return px;
    }
    let un = |c: u8| ((u32::from(c) * 255 + a / 2) / a).min(255) as u8;
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Blend one premultiplied overlay pixel onto one premultiplied destination pixel.
pub(crate) fn blend_premul(dst: PremulRgba8, src: PremulRgba8, mode: BlendMode) -> PremulRgba8 {
    if src[3] == 0 && src[0] == 0 && src[1] == 0 && src[2] == 0 {
        return dst;
    }
    let sa = u16::from(src[3]);
    let inv = 255u16 - sa;
    let alpha = add_sat_u8(src[3], mul_div255_u8(u16::from(dst[3]), inv));

    let mut out = [0u8; 4];
    for i in 0..3 {
        let s = u16::from(src[i]);
        let d = u16::from(dst[i]);
        out[i] = match mode {
            BlendMode::Normal => add_sat_u8(src[i], mul_div255_u8(d, inv)),
            BlendMode::Additive => add_sat_u8(dst[i], src[i]),
            BlendMode::Screen => add_sat_u8(src[i], mul_div255_u8(d, 255 - s)),
            // d * (1 - sa + s): transparent overlay leaves d, opaque black gives 0.
            BlendMode::Multiply => mul_div255_u8(d, (inv + s).min(255)),
        };
    }
    out[3] = match mode {
        BlendMode::Additive => add_sat_u8(dst[3], src[3]),
        BlendMode::Multiply => dst[3],
        BlendMode::Normal | BlendMode::Screen => alpha,
    };
    // Keep the premultiplied invariant c <= a.
    for i in 0..3 {
        out[i] = out[i].min(out[3]);
    }
    out
}

/// Composite a premultiplied RGBA8 overlay onto a straight-alpha buffer in place.
///
/// `opacity` scales the overlay before blending.
pub(crate) fn composite_overlay_in_place(
    dst: &mut FrameRGBA,
    overlay: &[u8],
    mode: BlendMode,
    opacity: f32,
) -> RetrofxResult<()> {
    if overlay.len() != dst.data.len() {
        return Err(RetrofxError::render(format!(
            "overlay has {} bytes, expected {}",
            overlay.len(),
            dst.data.len()
        )));
    }
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return Ok(());
    }
    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;

    for (d, s) in dst.data.chunks_exact_mut(4).zip(overlay.chunks_exact(4)) {
        if s == [0, 0, 0, 0] {
            continue;
        }
        let src = if op == 255 {
            [s[0], s[1], s[2], s[3]]
        } else {
            [
                mul_div255_u8(u16::from(s[0]), op),
                mul_div255_u8(u16::from(s[1]), op),
                mul_div255_u8(u16::from(s[2]), op),
                mul_div255_u8(u16::from(s[3]), op),
            ]
        };
        let base = premultiply([d[0], d[1], d[2], d[3]]);
        let out = unpremultiply(blend_premul(base, src, mode));
        d.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blend.rs"]
mod tests;
