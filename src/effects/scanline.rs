use serde::{Deserialize, Serialize};

use crate::foundation::core::FrameRGBA;
use crate::foundation::error::RetrofxResult;
use crate::layer::kind::OptionValue;
use crate::layer::options::unknown_key;

/// Options for the `scanline` kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanlineOptions {
    /// Dark rows per band.
    pub thickness: u32,
    /// Band period in rows.
    pub spacing: u32,
}

impl Default for ScanlineOptions {
    fn default() -> Self {
        Self {
            thickness: 1,
            spacing: 2,
        }
    }
}

impl ScanlineOptions {
    pub(crate) fn sanitized(&self) -> Self {
        let d = Self::default();
        Self {
            thickness: if self.thickness == 0 { d.thickness } else { self.thickness },
            spacing: if self.spacing == 0 { d.spacing } else { self.spacing },
        }
    }

    pub(crate) fn set(&mut self, key: &str, value: &OptionValue) -> RetrofxResult<()> {
        match key {
            "thickness" => self.thickness = value.as_u32(key)?,
            "spacing" => self.spacing = value.as_u32(key)?,
            _ => return Err(unknown_key("scanline", key)),
        }
        Ok(())
    }
}

/// Darken every `spacing`-periodic band of `thickness` rows by `1 - 0.7 * intensity`.
///
/// The band offset advances with `frame_index mod spacing`, so the pattern only closes the
/// loop when the frame count is a multiple of `spacing`.
pub(crate) fn apply(src: &FrameRGBA, opts: &ScanlineOptions, intensity: f32, frame_index: u32) -> FrameRGBA {
    let o = opts.sanitized();
    let factor = 1.0 - 0.7 * intensity.clamp(0.0, 1.0);
    let offset = frame_index % o.spacing;
    let row_bytes = src.width as usize * 4;

    let mut out = src.clone();
    if row_bytes == 0 {
        return out;
    }
    for (y, row) in out.data.chunks_exact_mut(row_bytes).enumerate() {
        let pos = ((y as u64 + u64::from(offset)) % u64::from(o.spacing)) as u32;
        if pos >= o.thickness {
            continue;
        }
        for px in row.chunks_exact_mut(4) {
            for c in &mut px[..3] {
                *c = (f32::from(*c) * factor).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/scanline.rs"]
mod tests;
