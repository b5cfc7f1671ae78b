//! Per-slide frame production.

pub mod renderer;

pub use renderer::{FrameRenderer, SlideFrames};
