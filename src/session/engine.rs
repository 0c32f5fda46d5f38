use std::str::FromStr;
use std::sync::Arc;

use crate::animation::phase::Phase;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Frame, FrameRGBA, FrameRate};
use crate::foundation::error::{RetrofxError, RetrofxResult};
use crate::layer::stack::EffectLayer;
use crate::particles::sprite::DEFAULT_SPRITE_CACHE_CAPACITY;
use crate::render::backend::{BackendKind, Backends, CpuBackend};
use crate::render::pipeline::{self, CancelToken, RenderOutcome, RenderThreading};

/// Which procedural backend the engine may use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendPreference {
    /// GPU when the `gpu` feature is enabled and the probe succeeds, CPU otherwise.
    #[default]
    Auto,
    /// Always the CPU backend.
    Cpu,
}

impl FromStr for BackendPreference {
    type Err = RetrofxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "cpu" => Ok(Self::Cpu),
            other => Err(RetrofxError::validation(format!(
                "unknown backend preference '{other}' (expected 'auto' or 'cpu')"
            ))),
        }
    }
}

/// Options controlling [`Engine`] construction and multi-frame rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineOpts {
    /// Backend selection policy.
    pub backend: BackendPreference,
    /// Frame-level parallelism.
    pub threading: RenderThreading,
    /// Maximum number of decoded custom sprites kept in memory.
    pub sprite_cache_capacity: usize,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            backend: BackendPreference::Auto,
            threading: RenderThreading::default(),
            sprite_cache_capacity: DEFAULT_SPRITE_CACHE_CAPACITY,
        }
    }
}

impl EngineOpts {
    /// Defaults overlaid with `RETROFX_BACKEND`, `RETROFX_THREADS` and `RETROFX_SPRITE_CACHE`.
    ///
    /// Unset or unparseable variables leave the default in place.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    pub(crate) fn overlay(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(pref) = var("RETROFX_BACKEND").and_then(|v| v.parse().ok()) {
            self.backend = pref;
        }
        if let Some(n) = var("RETROFX_THREADS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            self.threading = RenderThreading {
                parallel: true,
                threads: Some(n),
            };
        }
        if let Some(n) = var("RETROFX_SPRITE_CACHE")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            self.sprite_cache_capacity = n;
        }
        self
    }
}

/// Entry point for rendering layer stacks.
///
/// The engine owns the backends, chosen once at construction. Every render call reads an
/// immutable snapshot of the layers it is given; stacks are never retained.
#[derive(Debug)]
pub struct Engine {
    opts: EngineOpts,
    cpu: Arc<CpuBackend>,
    backends: Backends,
}

impl Engine {
    /// Build an engine. With [`BackendPreference::Auto`] and the `gpu` feature the GPU is probed
    /// here, once; a failed probe is logged and the CPU backend is used.
    pub fn new(opts: EngineOpts) -> Self {
        let cpu = Arc::new(CpuBackend::new(opts.sprite_cache_capacity));
        let backends = select_backends(opts.backend, &cpu);
        tracing::debug!(backends = ?backends, "engine ready");
        Self {
            opts,
            cpu,
            backends,
        }
    }

    /// Engine options.
    pub fn opts(&self) -> &EngineOpts {
        &self.opts
    }

    /// Backend serving the procedural layers.
    pub fn backend_kind(&self) -> BackendKind {
        self.backends.flame_kind()
    }

    /// Current backend pair.
    pub fn backends(&self) -> &Backends {
        &self.backends
    }

    /// Drop the GPU backend for the rest of this engine's life.
    ///
    /// Callers use this after a render failed with a backend error (or timed out) and retry.
    pub fn force_cpu(&mut self) {
        if self.backend_kind() != BackendKind::Cpu || self.backends.particle_kind() != BackendKind::Cpu {
            tracing::info!("switching to cpu backend");
        }
        self.opts.backend = BackendPreference::Cpu;
        self.backends = Backends::cpu_only(self.cpu.clone());
    }

    /// Apply one layer to `buf` at a given loop position.
    pub fn apply_layer(
        &self,
        buf: &FrameRGBA,
        layer: &EffectLayer,
        frame_index: u32,
        phase: Phase,
    ) -> RetrofxResult<FrameRGBA> {
        pipeline::apply_layer(buf, layer, frame_index, phase, &self.backends)
    }

    /// Render one frame of an `frame_count`-frame loop.
    pub fn render_frame(
        &self,
        base: &FrameRGBA,
        layers: &[EffectLayer],
        frame_index: u32,
        frame_count: u32,
    ) -> RetrofxResult<FrameRGBA> {
        pipeline::render_frame(base, layers, frame_index, frame_count, &self.backends)
    }

    /// Render the whole loop.
    pub fn render_frames(
        &self,
        base: &FrameRGBA,
        layers: &[EffectLayer],
        frame_count: u32,
        rate: FrameRate,
    ) -> RetrofxResult<Vec<Frame>> {
        let outcome = pipeline::render_frames(
            base,
            layers,
            frame_count,
            rate,
            &self.backends,
            &self.opts.threading,
            None,
            None,
        )?;
        outcome
            .into_frames()
            .ok_or_else(|| RetrofxError::render("render cancelled without a cancel token"))
    }

    /// Render the whole loop, reporting progress in `[0, 100]` and honouring `cancel`.
    pub fn render_frames_with_progress(
        &self,
        base: &FrameRGBA,
        layers: &[EffectLayer],
        frame_count: u32,
        rate: FrameRate,
        progress: &mut (dyn FnMut(f32) + Send),
        cancel: &CancelToken,
    ) -> RetrofxResult<RenderOutcome> {
        pipeline::render_frames(
            base,
            layers,
            frame_count,
            rate,
            &self.backends,
            &self.opts.threading,
            Some(progress),
            Some(cancel),
        )
    }

    /// Render the whole loop, then hand it to `sink`.
    ///
    /// The sink is only touched once every frame exists; a cancelled or failed render never
    /// reaches it.
    #[tracing::instrument(level = "debug", skip_all, fields(frames = frame_count))]
    pub fn render_to_sink(
        &self,
        base: &FrameRGBA,
        layers: &[EffectLayer],
        frame_count: u32,
        rate: FrameRate,
        sink: &mut dyn FrameSink,
        cancel: Option<&CancelToken>,
    ) -> RetrofxResult<RenderOutcome> {
        let outcome = pipeline::render_frames(
            base,
            layers,
            frame_count,
            rate,
            &self.backends,
            &self.opts.threading,
            None,
            cancel,
        )?;
        let RenderOutcome::Completed(frames) = outcome else {
            return Ok(RenderOutcome::Cancelled);
        };

        sink.begin(SinkConfig {
            width: base.width,
            height: base.height,
            fps: rate,
            frame_count,
        })?;
        for (i, frame) in (0u32..).zip(&frames) {
            sink.push_frame(i, frame)?;
        }
        sink.end()?;
        Ok(RenderOutcome::Completed(frames))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineOpts::default())
    }
}

#[cfg(feature = "gpu")]
fn select_backends(pref: BackendPreference, cpu: &Arc<CpuBackend>) -> Backends {
    if pref == BackendPreference::Cpu {
        return Backends::cpu_only(cpu.clone());
    }
    match crate::render::gpu::GpuBackend::probe(cpu.clone()) {
        Ok(gpu) => {
            tracing::info!(adapter = gpu.adapter_name(), "gpu backend selected");
            let gpu = Arc::new(gpu);
            Backends::new(gpu.clone(), gpu)
        }
        Err(e) => {
            tracing::info!(error = %e, "gpu unavailable, using cpu backend");
            Backends::cpu_only(cpu.clone())
        }
    }
}

#[cfg(not(feature = "gpu"))]
fn select_backends(_pref: BackendPreference, cpu: &Arc<CpuBackend>) -> Backends {
    Backends::cpu_only(cpu.clone())
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;
