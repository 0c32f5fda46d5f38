use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::Frame;
use crate::foundation::error::{RetrofxError, RetrofxResult};

/// Writes each frame as `frame_0000.png`, `frame_0001.png`, ... into one directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    last_index: Option<u32>,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    /// Sink writing into `dir`, created on `begin` if missing.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            last_index: None,
            written: Vec::new(),
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in index order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

/// File name of frame `index`.
pub fn frame_file_name(index: u32) -> String {
    format!("frame_{index:04}.png")
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> RetrofxResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(RetrofxError::validation(
                "png sink width/height must be non-zero",
            ));
        }
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create output directory '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.last_index = None;
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, index: u32, frame: &Frame) -> RetrofxResult<()> {
        let Some(cfg) = self.cfg.as_ref() else {
            return Err(RetrofxError::validation("png sink: push_frame before begin"));
        };
        if let Some(last) = self.last_index
            && index <= last
        {
            return Err(RetrofxError::validation(
                "png sink received out-of-order frame index",
            ));
        }
        let buf = &frame.buffer;
        if buf.width != cfg.width || buf.height != cfg.height {
            return Err(RetrofxError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                buf.width, buf.height, cfg.width, cfg.height
            )));
        }

        let path = self.dir.join(frame_file_name(index));
        image::save_buffer(
            &path,
            &buf.data,
            buf.width,
            buf.height,
            image::ExtendedColorType::Rgba8,
        )
        .with_context(|| format!("failed to write '{}'", path.display()))?;
        tracing::debug!(frame = index, path = %path.display(), "png written");
        self.last_index = Some(index);
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> RetrofxResult<()> {
        if self.cfg.is_none() {
            return Err(RetrofxError::validation("png sink: end before begin"));
        }
        tracing::info!(frames = self.written.len(), dir = %self.dir.display(), "png sequence finished");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
