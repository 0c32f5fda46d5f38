//! Backend selection and the frame compositor.
//!
//! - [`backend`] holds the capability traits and the portable CPU implementation.
//! - `gpu` (feature `gpu`) runs flames and particles as `wgpu` fragment programs.
//! - [`pipeline`] applies a layer stack to every frame of a loop.

/// Backend kinds, capability traits and the CPU backend.
pub mod backend;
/// `wgpu` flame and particle programs.
#[cfg(feature = "gpu")]
#[allow(unsafe_code)]
pub mod gpu;
/// Layer application and multi-frame rendering.
pub mod pipeline;
pub(crate) mod raster;
