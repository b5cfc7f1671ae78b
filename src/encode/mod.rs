//! Frame sinks: where rendered frames go.

pub mod ffmpeg;
pub mod sink;

pub use ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use sink::{Frame, FrameSink, InMemorySink, SinkConfig};
