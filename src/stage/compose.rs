use crate::foundation::core::Rgb8;
use crate::foundation::error::{SlidewaveError, SlidewaveResult};
use crate::foundation::math::clamp01;
use crate::mask::CoverageBuffer;
use crate::stage::canvas::Canvas;
use crate::stage::sprite::Sprite;
use rayon::prelude::*;

/// One draw call: a sprite and an optional coverage mask in canvas space.
#[derive(Clone, Copy, Debug)]
pub struct Layer<'a> {
    pub sprite: &'a Sprite,
    pub mask: Option<&'a CoverageBuffer>,
}

/// Canvas plus background; cleared at the start of every frame.
#[derive(Clone, Debug)]
pub struct Stage {
    canvas: Canvas,
    background: Rgb8,
}

impl Stage {
    pub fn new(width: u32, height: u32, background: Rgb8) -> Self {
        let mut canvas = Canvas::new(width, height);
        canvas.clear(background);
        Self { canvas, background }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn background(&self) -> Rgb8 {
        self.background
    }

    pub fn clear(&mut self) {
        self.canvas.clear(self.background);
    }

    /// Clear, then draw `layers` back to front.
    pub fn render(&mut self, layers: &[Layer<'_>]) -> SlidewaveResult<&Canvas> {
        self.clear();
        for layer in layers {
            composite(&mut self.canvas, layer)?;
        }
        Ok(&self.canvas)
    }
}

/// Alpha-over `layer` onto `canvas`, visiting only the sprite's clipped bounding box.
pub fn composite(canvas: &mut Canvas, layer: &Layer<'_>) -> SlidewaveResult<()> {
    let sprite = layer.sprite;
    sprite.validate()?;
    if let Some(mask) = layer.mask
        && (mask.width != canvas.width
            || mask.height != canvas.height
            || mask.data.len() != canvas.data.len() / 3)
    {
        return Err(SlidewaveError::evaluation(format!(
            "mask is {}x{}, canvas is {}x{}",
            mask.width, mask.height, canvas.width, canvas.height
        )));
    }

    let opacity = clamp01(sprite.opacity) as f32;
    let (sw, sh) = (sprite.width(), sprite.height());
    if opacity <= 0.0 || sw == 0 || sh == 0 || canvas.width == 0 || canvas.height == 0 {
        return Ok(());
    }

    let bounds = sprite.bounds();
    let x0 = bounds.x0.floor().max(0.0) as usize;
    let y0 = bounds.y0.floor().max(0.0) as usize;
    let x1 = (bounds.x1.ceil().max(0.0) as usize).min(canvas.width as usize);
    let y1 = (bounds.y1.ceil().max(0.0) as usize).min(canvas.height as usize);
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let inv = sprite.transform().inverse();
    let [a, b, c, d, e, f] = inv.as_coeffs();
    let cw = canvas.width as usize;
    let src = &sprite.image;
    let mask = layer.mask;

    canvas.data[y0 * cw * 3..y1 * cw * 3]
        .par_chunks_mut(cw * 3)
        .enumerate()
        .for_each(|(row_idx, row)| {
            let y = y0 + row_idx;
            let py = y as f64 + 0.5;
            for x in x0..x1 {
                let coverage = match mask {
                    Some(m) => m.data[y * cw + x],
                    None => 1.0,
                };
                let alpha = opacity * coverage;
                if alpha <= 0.0 {
                    continue;
                }
                let px = x as f64 + 0.5;
                // Source pixel-index space: centres sit at integer coordinates.
                let sx = a * px + c * py + e - 0.5;
                let sy = b * px + d * py + f - 0.5;
                let Some(color) = sample_bilinear(src, sx, sy) else {
                    continue;
                };
                let dst = &mut row[x * 3..x * 3 + 3];
                for (o, s) in dst.iter_mut().zip(color) {
                    *o = *o * (1.0 - alpha) + s * alpha;
                }
            }
        });
    Ok(())
}

/// Bilinear sample; `None` when the top-left tap falls outside the image.
fn sample_bilinear(img: &image::RgbImage, sx: f64, sy: f64) -> Option<[f32; 3]> {
    let (w, h) = img.dimensions();
    let fx0 = sx.floor();
    let fy0 = sy.floor();
    if fx0 < 0.0 || fy0 < 0.0 || fx0 >= f64::from(w) || fy0 >= f64::from(h) {
        return None;
    }
    let (x1, y1) = (fx0 as u32, fy0 as u32);
    let x2 = (x1 + 1).min(w - 1);
    let y2 = (y1 + 1).min(h - 1);
    let tx = (sx - fx0) as f32;
    let ty = (sy - fy0) as f32;

    let p11 = img.get_pixel(x1, y1).0;
    let p21 = img.get_pixel(x2, y1).0;
    let p12 = img.get_pixel(x1, y2).0;
    let p22 = img.get_pixel(x2, y2).0;

    let mut out = [0.0f32; 3];
    for (ch, o) in out.iter_mut().enumerate() {
        let top = f32::from(p11[ch]) * (1.0 - tx) + f32::from(p21[ch]) * tx;
        let bottom = f32::from(p12[ch]) * (1.0 - tx) + f32::from(p22[ch]) * tx;
        *o = (top * (1.0 - ty) + bottom * ty) / 255.0;
    }
    Some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/stage/compose.rs"]
mod tests;
