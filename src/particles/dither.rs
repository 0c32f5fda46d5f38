use serde::{Deserialize, Serialize};

use crate::effects::blend::{premultiply, unpremultiply};
use crate::foundation::color::Rgb8;

/// Fixed palettes for ordered dithering of the particle overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DitherPalette {
    /// No dithering.
    #[default]
    None,
    /// Four greens.
    Gameboy,
    /// CGA mode 4, palette 1 high intensity.
    Cga,
    /// PICO-8 sixteen colors.
    Pico8,
    /// Four grays.
    Grayscale,
}

const GAMEBOY: [Rgb8; 4] = [
    Rgb8::new(0x0f, 0x38, 0x0f),
    Rgb8::new(0x30, 0x62, 0x30),
    Rgb8::new(0x8b, 0xac, 0x0f),
    Rgb8::new(0x9b, 0xbc, 0x0f),
];

const CGA: [Rgb8; 4] = [
    Rgb8::new(0x00, 0x00, 0x00),
    Rgb8::new(0x55, 0xff, 0xff),
    Rgb8::new(0xff, 0x55, 0xff),
    Rgb8::new(0xff, 0xff, 0xff),
];

const PICO8: [Rgb8; 16] = [
    Rgb8::new(0x00, 0x00, 0x00),
    Rgb8::new(0x1d, 0x2b, 0x53),
    Rgb8::new(0x7e, 0x25, 0x53),
    Rgb8::new(0x00, 0x87, 0x51),
    Rgb8::new(0xab, 0x52, 0x36),
    Rgb8::new(0x5f, 0x57, 0x4f),
    Rgb8::new(0xc2, 0xc3, 0xc7),
    Rgb8::new(0xff, 0xf1, 0xe8),
    Rgb8::new(0xff, 0x00, 0x4d),
    Rgb8::new(0xff, 0xa3, 0x00),
    Rgb8::new(0xff, 0xec, 0x27),
    Rgb8::new(0x00, 0xe4, 0x36),
    Rgb8::new(0x29, 0xad, 0xff),
    Rgb8::new(0x83, 0x76, 0x9c),
    Rgb8::new(0xff, 0x77, 0xa8),
    Rgb8::new(0xff, 0xcc, 0xaa),
];

const GRAYSCALE: [Rgb8; 4] = [
    Rgb8::new(0, 0, 0),
    Rgb8::new(85, 85, 85),
    Rgb8::new(170, 170, 170),
    Rgb8::new(255, 255, 255),
];

/// 4x4 Bayer threshold matrix, values `0..16`.
pub(crate) const BAYER4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// Spread of the threshold offset in 8-bit units.
const SPREAD: f32 = 48.0;

impl DitherPalette {
    /// Palette colors; empty for [`DitherPalette::None`].
    pub fn colors(self) -> &'static [Rgb8] {
        match self {
            Self::None => &[],
            Self::Gameboy => &GAMEBOY,
            Self::Cga => &CGA,
            Self::Pico8 => &PICO8,
            Self::Grayscale => &GRAYSCALE,
        }
    }
}

pub(crate) fn nearest(palette: &[Rgb8], rgb: [f32; 3]) -> Rgb8 {
    let mut best = palette[0];
    let mut best_d = f32::INFINITY;
    for &c in palette {
        let dr = rgb[0] - f32::from(c.r);
        let dg = rgb[1] - f32::from(c.g);
        let db = rgb[2] - f32::from(c.b);
        let d = dr * dr + dg * dg + db * db;
        if d < best_d {
            best_d = d;
            best = c;
        }
    }
    best
}

/// Quantize one straight-alpha color at pixel `(x, y)`.
pub(crate) fn dither_pixel(palette: &[Rgb8], rgb: [u8; 3], x: u32, y: u32) -> Rgb8 {
    let threshold = f32::from(BAYER4[(y & 3) as usize][(x & 3) as usize]) / 16.0 - 0.5;
    let off = threshold * SPREAD;
    nearest(
        palette,
        [
            f32::from(rgb[0]) + off,
            f32::from(rgb[1]) + off,
            f32::from(rgb[2]) + off,
        ],
    )
}

/// Ordered-dither a premultiplied overlay in place, mixing with the original by `amount`.
///
/// Fully transparent pixels are left alone so the overlay's coverage does not change.
pub(crate) fn dither_overlay(overlay: &mut [u8], width: u32, palette: DitherPalette, amount: f32) {
    let colors = palette.colors();
    let amount = amount.clamp(0.0, 1.0);
    if colors.is_empty() || amount <= 0.0 || width == 0 {
        return;
    }
    for (i, px) in overlay.chunks_exact_mut(4).enumerate() {
        if px[3] == 0 {
            continue;
        }
        let x = (i as u32) % width;
        let y = (i as u32) / width;
        let straight = unpremultiply([px[0], px[1], px[2], px[3]]);
        let q = dither_pixel(colors, [straight[0], straight[1], straight[2]], x, y);
        let orig = Rgb8::new(straight[0], straight[1], straight[2]);
        let mixed = orig.mix(q, amount);
        let out = premultiply([mixed.r, mixed.g, mixed.b, px[3]]);
        px.copy_from_slice(&out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/dither.rs"]
mod tests;
