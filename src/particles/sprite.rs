use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::effects::blend::premultiply;
use crate::foundation::error::{RetrofxError, RetrofxResult};
use crate::foundation::math::fingerprint_bytes;
use crate::render::raster::premul_bytes_to_image;

/// Default number of decoded sprites kept per engine.
pub const DEFAULT_SPRITE_CACHE_CAPACITY: usize = 16;

/// Sprites larger than this on either side are downscaled on decode.
const MAX_SPRITE_SIDE: u32 = 256;

/// A decoded custom particle sprite, premultiplied RGBA8.
#[derive(Clone)]
pub struct Sprite {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied pixels.
    pub rgba8_premul: Arc<Vec<u8>>,
    pub(crate) paint: vello_cpu::Image,
}

impl std::fmt::Debug for Sprite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sprite")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Decode a base64 sprite, with or without a `data:<mime>;base64,` prefix.
pub fn decode_sprite(data: &str) -> RetrofxResult<Sprite> {
    let payload = match data.trim().split_once(";base64,") {
        Some((head, tail)) if head.starts_with("data:") => tail,
        _ => data.trim(),
    };
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .context("decode sprite base64")?;
    let img = image::load_from_memory(&bytes).context("decode sprite image")?;
    let img = if img.width() > MAX_SPRITE_SIDE || img.height() > MAX_SPRITE_SIDE {
        img.thumbnail(MAX_SPRITE_SIDE, MAX_SPRITE_SIDE)
    } else {
        img
    };
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(RetrofxError::validation("sprite image is empty"));
    }
    let mut rgba8_premul = rgba.into_raw();
    for px in rgba8_premul.chunks_exact_mut(4) {
        let p = premultiply([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&p);
    }
    let paint = premul_bytes_to_image(&rgba8_premul, width, height)?;
    Ok(Sprite {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
        paint,
    })
}

/// Bounded LRU of decoded sprites keyed by a hash of the encoded string.
///
/// Decode failures are cached too, so a broken sprite is reported once rather than per frame.
#[derive(Debug)]
pub struct SpriteCache {
    entries: HashMap<u64, Option<Arc<Sprite>>>,
    lru: VecDeque<u64>,
    capacity: usize,
}

impl SpriteCache {
    /// Empty cache holding at most `capacity` sprites (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up `data`, decoding synchronously on a miss. `None` when the sprite cannot be decoded.
    pub fn get_or_decode(&mut self, data: &str) -> Option<Arc<Sprite>> {
        let key = fingerprint_bytes(data.as_bytes());
        if let Some(hit) = self.entries.get(&key).cloned() {
            self.touch(key);
            return hit;
        }
        let decoded = match decode_sprite(data) {
            Ok(s) => Some(Arc::new(s)),
            Err(e) => {
                tracing::warn!(error = %e, "custom sprite failed to decode, drawing circles");
                None
            }
        };
        self.insert(key, decoded.clone());
        decoded
    }

    fn insert(&mut self, key: u64, sprite: Option<Arc<Sprite>>) {
        self.entries.insert(key, sprite);
        self.touch(key);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                self.entries.remove(&old);
            }
        }
    }

    fn touch(&mut self, key: u64) {
        if let Some(pos) = self.lru.iter().position(|x| *x == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key);
    }
}

impl Default for SpriteCache {
    fn default() -> Self {
        Self::new(DEFAULT_SPRITE_CACHE_CAPACITY)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/sprite.rs"]
mod tests;
