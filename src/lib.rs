//! Slidewave renders a timed sequence of still images into a video.
//!
//! Every slide has an entrance, a hold and an exit phase, each driven by a named effect: fades,
//! rotations, slides, zooms, procedural wipe masks with feathered edges and Ken Burns pan/zoom.
//! The public API is session-oriented:
//!
//! - Load and validate a [`Show`]
//! - Create a [`RenderSession`] (all effect names and parameters are resolved here)
//! - Render single frames or stream the whole show into a [`FrameSink`]
#![forbid(unsafe_code)]

mod foundation;

/// Easing curves.
pub mod animation;
/// Slide image sources.
pub mod assets;
/// Effect evaluation and the effect registry.
pub mod effects;
/// Frame sinks.
pub mod encode;
/// Procedural wipe masks.
pub mod mask;
/// Per-slide frame production.
pub mod render;
/// Show description and frame planning.
pub mod scene;
/// Whole-show rendering.
pub mod session;
/// Sprites, canvas and compositing.
pub mod stage;

pub use crate::foundation::core::{
    Affine, Direction, Fps, FrameIndex, Point, Rect, Rgb8, Size, Vec2,
};
pub use crate::foundation::error::{SlidewaveError, SlidewaveResult};

pub use crate::animation::ease::{CubicBezier, Ease};
pub use crate::assets::image::{FsImageSource, ImageSource, InMemoryImageSource, fit_cover};
pub use crate::effects::{
    Effect, EffectContext, EffectParams, EffectRegistry, EffectRegistryBuilder, ParamValue,
    TransformDelta,
};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use crate::encode::sink::{Frame, FrameSink, InMemorySink, SinkConfig};
pub use crate::mask::{
    CoverageBuffer, FeatherCurve, MaskRasterizer, MaskSpec, Orientation, Shape,
};
pub use crate::render::renderer::{FrameRenderer, SlideFrames};
pub use crate::scene::model::{EffectSpec, Phase, Show, Slide};
pub use crate::scene::timeline::{FrameAllocation, SlidePlan, Timeline};
pub use crate::session::render_session::{RenderSession, RenderSessionOpts, RenderStats};
pub use crate::stage::canvas::{Canvas, PixelFormat};
pub use crate::stage::compose::{Layer, Stage};
pub use crate::stage::sprite::Sprite;
