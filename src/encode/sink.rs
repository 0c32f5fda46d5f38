use crate::foundation::core::{Frame, FrameRate};
use crate::foundation::error::RetrofxResult;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frame rate the loop was rendered for.
    pub fps: FrameRate,
    /// Number of frames that will be pushed.
    pub frame_count: u32,
}

/// Sink contract for consuming a rendered loop.
///
/// Ordering contract: `push_frame` is called exactly `frame_count` times with indices
/// `0..frame_count` in increasing order, and only for sequences that rendered completely.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> RetrofxResult<()>;
    /// Push one frame in increasing index order.
    fn push_frame(&mut self, index: u32, frame: &Frame) -> RetrofxResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> RetrofxResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    pub(crate) frames: Vec<(u32, Frame)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(u32, Frame)] {
        &self.frames
    }

    /// `true` once `end` ran.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> RetrofxResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, index: u32, frame: &Frame) -> RetrofxResult<()> {
        self.frames.push((index, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> RetrofxResult<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
