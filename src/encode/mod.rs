//! Frame sinks.
//!
//! Sinks receive a finished loop in index order. Container encoding (GIF, video) is the business
//! of whoever implements [`sink::FrameSink`].

/// PNG sequence output used by the developer CLI.
pub mod png;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
