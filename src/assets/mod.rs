//! Slide image sources.

pub mod image;

pub use self::image::{FsImageSource, ImageSource, InMemoryImageSource, fit_cover};
