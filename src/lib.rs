//! retrofx renders seamlessly looping retro effects over a still image.
//!
//! A caller owns an [`EffectStack`] of layers (scanlines, tape glitch, grain, phosphor, channel
//! split, motion blur, particles, flames) and hands an immutable snapshot of it, together with a
//! base [`FrameRGBA`], to an [`Engine`]:
//!
//! - [`Engine::render_frames`] produces `frame_count` [`Frame`]s whose last frame flows back into
//!   the first.
//! - [`Engine::render_frames_with_progress`] reports progress and honours a [`CancelToken`].
//! - [`Engine::render_to_sink`] hands a finished sequence to a [`FrameSink`].
//!
//! Particles and flames run on the CPU by default. With the `gpu` feature the engine probes a
//! `wgpu` adapter once and falls back to the CPU when none is usable.
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod animation;
pub mod effects;
/// Frame sinks.
pub mod encode;
pub mod flames;
pub mod foundation;
pub mod layer;
pub mod particles;
/// Backends and the frame compositor.
pub mod render;
/// Engine facade.
pub mod session;

pub use crate::animation::phase::Phase;
pub use crate::effects::BlendMode;
pub use crate::encode::png::PngSequenceSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::flames::options::FlameOptions;
pub use crate::foundation::core::{Frame, FrameRGBA, FrameRate};
pub use crate::foundation::error::{RetrofxError, RetrofxResult};
pub use crate::layer::kind::{EffectKind, OptionValue};
pub use crate::layer::options::EffectOptions;
pub use crate::layer::stack::{EffectLayer, EffectStack, LayerId};
pub use crate::particles::options::ParticleOptions;
pub use crate::render::backend::BackendKind;
pub use crate::render::pipeline::{CancelToken, RenderOutcome, RenderThreading};
pub use crate::session::engine::{BackendPreference, Engine, EngineOpts};
