use std::sync::{Arc, Mutex, PoisonError};

use crate::animation::phase::Phase;
use crate::flames::options::FlameOptions;
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::RetrofxResult;
use crate::particles::options::{ParticleOptions, ParticleShape};
use crate::particles::sprite::{Sprite, SpriteCache};

/// Available backend kinds.
///
/// - `Cpu` is always available.
/// - `Gpu` requires the `gpu` feature and a working adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// `vello_cpu` shapes plus direct pixel loops.
    Cpu,
    /// `wgpu` fragment programs.
    Gpu,
}

/// Capability interface for flame synthesis.
///
/// Implementations take `&self` so worker threads can share one instance; any device state must
/// be serialized internally.
pub trait FlameBackend: Send + Sync {
    /// Which implementation this is.
    fn kind(&self) -> BackendKind;

    /// Composite one flame layer onto `src`. Output has the dimensions of `src`.
    fn render_flames(
        &self,
        src: &FrameRGBA,
        opts: &FlameOptions,
        intensity: f32,
        phase: Phase,
    ) -> RetrofxResult<FrameRGBA>;
}

/// Capability interface for particle fields.
pub trait ParticleBackend: Send + Sync {
    /// Which implementation this is.
    fn kind(&self) -> BackendKind;

    /// Composite one particle layer onto `src`. Output has the dimensions of `src`.
    fn render_particles(
        &self,
        src: &FrameRGBA,
        opts: &ParticleOptions,
        intensity: f32,
        phase: Phase,
    ) -> RetrofxResult<FrameRGBA>;
}

/// Portable backend. Owns the custom sprite cache.
#[derive(Debug)]
pub struct CpuBackend {
    sprites: Mutex<SpriteCache>,
}

impl CpuBackend {
    /// Create a CPU backend whose sprite cache holds at most `sprite_cache_capacity` entries.
    pub fn new(sprite_cache_capacity: usize) -> Self {
        Self {
            sprites: Mutex::new(SpriteCache::new(sprite_cache_capacity)),
        }
    }

    /// Resolve the custom sprite of `opts`, decoding on first use.
    pub(crate) fn sprite_for(&self, opts: &ParticleOptions) -> Option<Arc<Sprite>> {
        if opts.shape != ParticleShape::Custom {
            return None;
        }
        let data = opts.sprite.as_deref()?;
        // Cache updates are single inserts; a poisoned lock still guards a consistent map.
        let mut cache = self.sprites.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get_or_decode(data)
    }

    /// Number of cached sprite decodes, failures included.
    pub fn cached_sprites(&self) -> usize {
        self.sprites.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self {
            sprites: Mutex::new(SpriteCache::default()),
        }
    }
}

impl FlameBackend for CpuBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Cpu
    }

    fn render_flames(
        &self,
        src: &FrameRGBA,
        opts: &FlameOptions,
        intensity: f32,
        phase: Phase,
    ) -> RetrofxResult<FrameRGBA> {
        crate::flames::cpu::apply(src, opts, intensity, phase)
    }
}

impl ParticleBackend for CpuBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Cpu
    }

    fn render_particles(
        &self,
        src: &FrameRGBA,
        opts: &ParticleOptions,
        intensity: f32,
        phase: Phase,
    ) -> RetrofxResult<FrameRGBA> {
        let sprite = self.sprite_for(opts);
        crate::particles::cpu::apply(src, opts, intensity, phase, sprite.as_deref())
    }
}

/// The pair of procedural backends a render uses.
///
/// Cheap to clone; renders take a snapshot so a later [`Backends::cpu_only`] swap never affects a
/// render in flight.
#[derive(Clone)]
pub struct Backends {
    pub(crate) flames: Arc<dyn FlameBackend>,
    pub(crate) particles: Arc<dyn ParticleBackend>,
}

impl Backends {
    /// Both kinds served by `cpu`.
    pub fn cpu_only(cpu: Arc<CpuBackend>) -> Self {
        Self {
            flames: cpu.clone(),
            particles: cpu,
        }
    }

    /// Explicit pair.
    pub fn new(flames: Arc<dyn FlameBackend>, particles: Arc<dyn ParticleBackend>) -> Self {
        Self { flames, particles }
    }

    /// Kind serving flame layers.
    pub fn flame_kind(&self) -> BackendKind {
        self.flames.kind()
    }

    /// Kind serving particle layers.
    pub fn particle_kind(&self) -> BackendKind {
        self.particles.kind()
    }
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends")
            .field("flames", &self.flames.kind())
            .field("particles", &self.particles.kind())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
