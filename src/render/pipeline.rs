use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use rayon::prelude::*;

use crate::animation::phase::Phase;
use crate::effects::{channel_split, grain, motion_blur, phosphor, scanline, tape};
use crate::foundation::core::{Frame, FrameRGBA, FrameRate};
use crate::foundation::error::{RetrofxError, RetrofxResult};
use crate::layer::options::EffectOptions;
use crate::layer::stack::EffectLayer;
use crate::render::backend::Backends;

/// Cooperative cancellation flag shared between a caller and an in-flight render.
///
/// Checked before each frame starts, never mid-frame.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// `true` once [`CancelToken::cancel`] was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a multi-frame render ended.
///
/// A cancelled render returns no frames at all: partial sequences are not valid output.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOutcome {
    /// Every frame, in index order.
    Completed(Vec<Frame>),
    /// Stopped between frames on request.
    Cancelled,
}

impl RenderOutcome {
    /// Frames of a completed render.
    pub fn into_frames(self) -> Option<Vec<Frame>> {
        match self {
            Self::Completed(frames) => Some(frames),
            Self::Cancelled => None,
        }
    }

    /// `true` for [`RenderOutcome::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Threading controls for multi-frame rendering.
pub struct RenderThreading {
    /// Render frames on a `rayon` pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

/// Apply one layer to `buf`.
///
/// Disabled layers return an unchanged copy. Output always has the dimensions of `buf`.
pub fn apply_layer(
    buf: &FrameRGBA,
    layer: &EffectLayer,
    frame_index: u32,
    phase: Phase,
    backends: &Backends,
) -> RetrofxResult<FrameRGBA> {
    if !layer.enabled {
        return Ok(buf.clone());
    }
    let intensity = if layer.intensity.is_nan() {
        0.0
    } else {
        layer.intensity.clamp(0.0, 1.0)
    };
    tracing::debug!(layer = %layer.id, kind = %layer.kind(), frame = frame_index, "apply layer");

    let out = match &layer.options {
        EffectOptions::Scanline(o) => scanline::apply(buf, o, intensity, frame_index),
        EffectOptions::TapeGlitch(o) => tape::apply(buf, o, intensity, frame_index, phase),
        EffectOptions::Noise(o) => grain::apply(buf, o, intensity, frame_index),
        EffectOptions::Phosphor(o) => phosphor::apply(buf, o, intensity, phase),
        EffectOptions::ChannelSplit(o) => channel_split::apply(buf, o, intensity, phase),
        EffectOptions::MotionBlur(o) => motion_blur::apply(buf, o, intensity, phase),
        EffectOptions::Particles(o) => backends.particles.render_particles(buf, o, intensity, phase)?,
        EffectOptions::Flames(o) => backends.flames.render_flames(buf, o, intensity, phase)?,
    };
    if !out.same_dimensions(buf) {
        return Err(RetrofxError::render(format!(
            "{} layer changed dimensions {}x{} -> {}x{}",
            layer.kind(),
            buf.width,
            buf.height,
            out.width,
            out.height
        )));
    }
    Ok(out)
}

/// Active layers in application order.
fn active_layers(layers: &[EffectLayer]) -> Vec<&EffectLayer> {
    let mut active: Vec<&EffectLayer> = layers.iter().filter(|l| l.enabled).collect();
    active.sort_by_key(|l| l.order);
    active
}

fn validate_base(base: &FrameRGBA) -> RetrofxResult<()> {
    let expected = FrameRGBA::byte_len(base.width, base.height)?;
    if base.data.len() != expected {
        return Err(RetrofxError::validation(format!(
            "buffer has {} bytes, expected {expected} for {}x{}",
            base.data.len(),
            base.width,
            base.height
        )));
    }
    Ok(())
}

fn render_one(
    base: &FrameRGBA,
    active: &[&EffectLayer],
    frame_index: u32,
    frame_count: u32,
    backends: &Backends,
) -> RetrofxResult<FrameRGBA> {
    let phase = Phase::of(frame_index, frame_count)?;
    let mut buf = base.clone();
    for layer in active {
        buf = apply_layer(&buf, layer, frame_index, phase, backends)?;
    }
    Ok(buf)
}

/// Render one frame of an `frame_count`-frame loop.
pub fn render_frame(
    base: &FrameRGBA,
    layers: &[EffectLayer],
    frame_index: u32,
    frame_count: u32,
    backends: &Backends,
) -> RetrofxResult<FrameRGBA> {
    validate_base(base)?;
    render_one(base, &active_layers(layers), frame_index, frame_count, backends)
}

/// Completion reporting shared by worker threads.
///
/// The counter is bumped and the callback invoked under one lock, so the reported sequence is
/// non-decreasing even when frames finish out of order.
struct Progress<'a> {
    total: u32,
    state: Mutex<(u32, Option<&'a mut (dyn FnMut(f32) + Send)>)>,
}

impl<'a> Progress<'a> {
    fn new(total: u32, callback: Option<&'a mut (dyn FnMut(f32) + Send)>) -> Self {
        Self {
            total,
            state: Mutex::new((0, callback)),
        }
    }

    fn frame_done(&self) {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let (done, callback) = &mut *guard;
        *done += 1;
        let pct = if *done >= self.total {
            100.0
        } else {
            (*done as f32 * 100.0 / self.total as f32).min(99.99)
        };
        if let Some(cb) = callback.as_mut() {
            cb(pct);
        }
    }
}

/// Render the whole loop: for each frame, clone `base` and apply every enabled layer in
/// ascending `order`.
///
/// `progress` receives a non-decreasing percentage after each frame; `100` arrives only after
/// the last one. `cancel` is checked before each frame starts.
#[allow(clippy::too_many_arguments)]
#[tracing::instrument(level = "debug", skip_all, fields(frames = frame_count, parallel = threading.parallel))]
pub fn render_frames(
    base: &FrameRGBA,
    layers: &[EffectLayer],
    frame_count: u32,
    rate: FrameRate,
    backends: &Backends,
    threading: &RenderThreading,
    progress: Option<&mut (dyn FnMut(f32) + Send)>,
    cancel: Option<&CancelToken>,
) -> RetrofxResult<RenderOutcome> {
    if frame_count == 0 {
        return Err(RetrofxError::validation("frame count must be > 0"));
    }
    validate_base(base)?;

    let active = active_layers(layers);
    let duration = rate.frame_duration_ms();
    let progress = Progress::new(frame_count, progress);
    let cancelled = || cancel.is_some_and(CancelToken::is_cancelled);

    let render = |i: u32| -> RetrofxResult<Option<Frame>> {
        if cancelled() {
            return Ok(None);
        }
        let buffer = render_one(base, &active, i, frame_count, backends)?;
        tracing::debug!(frame = i, "frame rendered");
        progress.frame_done();
        Ok(Some(Frame {
            buffer,
            display_duration_ms: duration,
        }))
    };

    let rendered: Vec<Option<Frame>> = if threading.parallel {
        let pool = build_thread_pool(threading.threads)?;
        pool.install(|| {
            (0..frame_count)
                .into_par_iter()
                .map(render)
                .collect::<RetrofxResult<Vec<_>>>()
        })?
    } else {
        let mut out = Vec::with_capacity(frame_count as usize);
        for i in 0..frame_count {
            match render(i)? {
                Some(frame) => out.push(Some(frame)),
                None => return Ok(RenderOutcome::Cancelled),
            }
        }
        out
    };

    let frames: Option<Vec<Frame>> = rendered.into_iter().collect();
    Ok(match frames {
        Some(frames) => RenderOutcome::Completed(frames),
        None => {
            tracing::debug!("render cancelled, partial frames discarded");
            RenderOutcome::Cancelled
        }
    })
}

fn build_thread_pool(threads: Option<usize>) -> RetrofxResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(RetrofxError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| RetrofxError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
