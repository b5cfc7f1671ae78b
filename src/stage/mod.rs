//! Sprite/stage compositing on a floating-point RGB canvas.

pub mod canvas;
pub mod compose;
pub mod sprite;

pub use canvas::{Canvas, PixelFormat};
pub use compose::{Layer, Stage, composite};
pub use sprite::Sprite;
