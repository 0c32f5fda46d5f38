use crate::foundation::error::{RetrofxError, RetrofxResult};

/// An RGBA8 pixel buffer, straight (non-premultiplied) alpha, row-major, tightly packed.
///
/// This is the only pixel representation crossing the engine boundary: the base image comes in
/// as a `FrameRGBA`, every layer maps a `FrameRGBA` to another of identical dimensions, and
/// frames handed to an encoder carry one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, `width * height * 4` long.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Wrap existing bytes, validating the length against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> RetrofxResult<Self> {
        let expected = Self::byte_len(width, height)?;
        if data.len() != expected {
            return Err(RetrofxError::validation(format!(
                "pixel buffer has {} bytes, expected {expected} for {width}x{height} rgba8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer filled with a single color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let n = (width as usize).saturating_mul(height as usize);
        Self {
            width,
            height,
            data: rgba.repeat(n),
        }
    }

    /// A fully transparent buffer.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self::solid(width, height, [0, 0, 0, 0])
    }

    /// Byte length of a `width x height` RGBA8 buffer, with overflow checks.
    pub fn byte_len(width: u32, height: u32) -> RetrofxResult<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| RetrofxError::validation("pixel buffer size overflow"))
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Return `true` when the buffer has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Return `true` when `other` has the same width and height.
    pub fn same_dimensions(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }

    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    /// Read one pixel. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Write one pixel. Panics when out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    /// Read a pixel with coordinates clamped to the buffer edges.
    #[inline]
    pub(crate) fn sample_clamped(&self, x: i64, y: i64) -> [u8; 4] {
        let cx = x.clamp(0, i64::from(self.width) - 1) as u32;
        let cy = y.clamp(0, i64::from(self.height) - 1) as u32;
        self.pixel(cx, cy)
    }
}

/// One output unit handed to an encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Final pixels for this frame.
    pub buffer: FrameRGBA,
    /// How long the frame is displayed, always > 0.
    pub display_duration_ms: u32,
}

/// Output frame rate in frames per second.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f32")]
pub struct FrameRate(f32);

impl TryFrom<f32> for FrameRate {
    type Error = RetrofxError;

    fn try_from(fps: f32) -> RetrofxResult<Self> {
        Self::new(fps)
    }
}

impl FrameRate {
    /// Create a validated frame rate (finite and > 0).
    pub fn new(fps: f32) -> RetrofxResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(RetrofxError::validation(format!(
                "frame rate must be finite and > 0, got {fps}"
            )));
        }
        Ok(Self(fps))
    }

    /// Frames per second.
    pub fn fps(self) -> f32 {
        self.0
    }

    /// Display duration of one frame, rounded to whole milliseconds and never below 1.
    pub fn frame_duration_ms(self) -> u32 {
        let ms = (1000.0 / f64::from(self.0)).round();
        if ms < 1.0 { 1 } else { ms.min(f64::from(u32::MAX)) as u32 }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
