use crate::foundation::core::Size;
use crate::foundation::error::{SlidewaveError, SlidewaveResult};
use image::RgbImage;
use image::imageops::{self, FilterType};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Resolves slide image identifiers into decoded RGB images.
pub trait ImageSource: Send + Sync {
    fn load(&self, id: &str) -> SlidewaveResult<RgbImage>;
}

/// Loads images from files below a root directory.
#[derive(Clone, Debug)]
pub struct FsImageSource {
    root: PathBuf,
}

impl FsImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, id: &str) -> SlidewaveResult<PathBuf> {
        Ok(self.root.join(normalize_rel_path(id)?))
    }
}

impl ImageSource for FsImageSource {
    fn load(&self, id: &str) -> SlidewaveResult<RgbImage> {
        let path = self.resolve(id)?;
        let bytes = std::fs::read(&path).map_err(|e| {
            SlidewaveError::resource(format!("failed to read image '{}': {e}", path.display()))
        })?;
        decode_rgb(&bytes)
            .map_err(|e| SlidewaveError::resource(format!("'{}': {e}", path.display())))
    }
}

/// Images registered up front; handy for tests and generated content.
#[derive(Clone, Debug, Default)]
pub struct InMemoryImageSource {
    images: HashMap<String, RgbImage>,
}

impl InMemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, image: RgbImage) {
        self.images.insert(id.into(), image);
    }

    pub fn with(mut self, id: impl Into<String>, image: RgbImage) -> Self {
        self.insert(id, image);
        self
    }
}

impl ImageSource for InMemoryImageSource {
    fn load(&self, id: &str) -> SlidewaveResult<RgbImage> {
        self.images
            .get(id)
            .cloned()
            .ok_or_else(|| SlidewaveError::resource(format!("image '{id}' not found")))
    }
}

/// Decode an encoded image (any format enabled in `image`) into RGB8, dropping alpha.
pub fn decode_rgb(bytes: &[u8]) -> SlidewaveResult<RgbImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| SlidewaveError::resource(format!("failed to decode image: {e}")))?;
    Ok(img.to_rgb8())
}

/// Scale `img` to cover `size` while keeping its aspect ratio, then crop the centre.
pub fn fit_cover(img: &RgbImage, size: Size) -> SlidewaveResult<RgbImage> {
    let (iw, ih) = img.dimensions();
    if iw == 0 || ih == 0 {
        return Err(SlidewaveError::resource("image has no pixels"));
    }
    if (iw, ih) == (size.width, size.height) {
        return Ok(img.clone());
    }

    let scale = (f64::from(size.width) / f64::from(iw)).max(f64::from(size.height) / f64::from(ih));
    let nw = ((f64::from(iw) * scale).round() as u32).max(size.width);
    let nh = ((f64::from(ih) * scale).round() as u32).max(size.height);
    let resized = if (nw, nh) == (iw, ih) {
        img.clone()
    } else {
        imageops::resize(img, nw, nh, FilterType::Triangle)
    };

    let x = (nw - size.width) / 2;
    let y = (nh - size.height) / 2;
    Ok(imageops::crop_imm(&resized, x, y, size.width, size.height).to_image())
}

/// Normalize and validate source-relative image paths.
///
/// Separators become `/`, `.` segments are dropped, and absolute paths or `..` segments are
/// rejected.
pub(crate) fn normalize_rel_path(source: &str) -> SlidewaveResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(SlidewaveError::validation("image paths must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(SlidewaveError::validation(
                "image paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(SlidewaveError::validation(
            "image path must contain a file name",
        ));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/image.rs"]
mod tests;
