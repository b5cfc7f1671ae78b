use crate::foundation::core::Rgb8;
use crate::foundation::error::{SlidewaveError, SlidewaveResult};
use crate::foundation::math::unit_to_u8;
use rayon::prelude::*;

/// Byte layout of frames handed to a sink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    #[default]
    Rgb24,
    Bgr24,
    /// RGB plus an opaque alpha byte.
    Rgba,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb24 | Self::Bgr24 => 3,
            Self::Rgba => 4,
        }
    }

    /// Name of the matching `ffmpeg` raw video pixel format.
    pub fn ffmpeg_name(self) -> &'static str {
        match self {
            Self::Rgb24 => "rgb24",
            Self::Bgr24 => "bgr24",
            Self::Rgba => "rgba",
        }
    }
}

/// Floating-point RGB frame buffer, channels in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; (width as usize) * (height as usize) * 3],
        }
    }

    pub fn clear(&mut self, color: Rgb8) {
        let c = color.to_f32();
        self.data.par_chunks_mut(3).for_each(|px| px.copy_from_slice(&c));
    }

    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Quantized 8-bit RGB of one pixel.
    pub fn pixel_rgb8(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixel(x, y).map(unit_to_u8)
    }

    /// Convert to packed bytes in `format`, replacing the contents of `out`.
    pub fn write_bytes(&self, format: PixelFormat, out: &mut Vec<u8>) {
        let w = self.width as usize;
        let bpp = format.bytes_per_pixel();
        out.clear();
        out.resize(w * (self.height as usize) * bpp, 0);
        if w == 0 {
            return;
        }
        out.par_chunks_mut(w * bpp)
            .zip(self.data.par_chunks(w * 3))
            .for_each(|(dst, src)| {
                for (d, s) in dst.chunks_exact_mut(bpp).zip(src.chunks_exact(3)) {
                    let (r, g, b) = (unit_to_u8(s[0]), unit_to_u8(s[1]), unit_to_u8(s[2]));
                    match format {
                        PixelFormat::Rgb24 => d.copy_from_slice(&[r, g, b]),
                        PixelFormat::Bgr24 => d.copy_from_slice(&[b, g, r]),
                        PixelFormat::Rgba => d.copy_from_slice(&[r, g, b, 255]),
                    }
                }
            });
    }

    pub fn to_rgb_image(&self) -> SlidewaveResult<image::RgbImage> {
        let mut bytes = Vec::new();
        self.write_bytes(PixelFormat::Rgb24, &mut bytes);
        image::RgbImage::from_raw(self.width, self.height, bytes)
            .ok_or_else(|| SlidewaveError::evaluation("canvas buffer does not match its size"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/canvas.rs"]
mod tests;
