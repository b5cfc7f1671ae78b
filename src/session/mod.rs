//! Whole-show rendering into a frame sink.

pub mod render_session;

pub use render_session::{RenderSession, RenderSessionOpts, RenderStats};
