use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{SlidewaveError, SlidewaveResult};
use crate::stage::canvas::PixelFormat;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    pub format: PixelFormat,
}

impl SinkConfig {
    /// Byte length of one packed frame.
    pub fn frame_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * self.format.bytes_per_pixel()
    }
}

/// A packed frame in the sink's pixel layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            data: Vec::new(),
        }
    }

    /// Check the frame against the layout announced in `begin`.
    pub fn check(&self, cfg: &SinkConfig) -> SlidewaveResult<()> {
        if self.width != cfg.width || self.height != cfg.height {
            return Err(SlidewaveError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                self.width, self.height, cfg.width, cfg.height
            )));
        }
        if self.format != cfg.format {
            return Err(SlidewaveError::validation(format!(
                "frame format mismatch: got {:?}, expected {:?}",
                self.format, cfg.format
            )));
        }
        if self.data.len() != cfg.frame_len() {
            return Err(SlidewaveError::validation(format!(
                "frame data is {} bytes, expected {}",
                self.data.len(),
                cfg.frame_len()
            )));
        }
        Ok(())
    }
}

/// Consumer of rendered frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order between
/// `begin` and `end`. After a failure the producer calls `abort` instead of `end`.
pub trait FrameSink: Send {
    fn begin(&mut self, cfg: SinkConfig) -> SlidewaveResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> SlidewaveResult<()>;
    fn end(&mut self) -> SlidewaveResult<()>;

    /// Release resources after a failed run. Output may be incomplete.
    fn abort(&mut self) {}
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, Frame)>,
    finished: bool,
    aborted: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, Frame)] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<(FrameIndex, Frame)> {
        self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> SlidewaveResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        self.aborted = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> SlidewaveResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| SlidewaveError::evaluation("in-memory sink not started"))?;
        frame.check(cfg)?;
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(SlidewaveError::evaluation(
                "in-memory sink received out-of-order frame index",
            ));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> SlidewaveResult<()> {
        self.finished = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
