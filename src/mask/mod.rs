//! Procedural wipe masks.
//!
//! A [`MaskRasterizer`] turns a [`MaskSpec`] and a progress value into a per-pixel
//! [`CoverageBuffer`]. Every shape is empty at progress 0 and covers the whole canvas at
//! progress 1; feathering only ever lowers coverage.

pub mod feather;
pub mod shape;

pub use feather::FeatherCurve;
pub use shape::{Orientation, Shape};

use crate::foundation::error::{SlidewaveError, SlidewaveResult};
use crate::foundation::math::clamp01;
use crate::mask::feather::{FeatherScratch, feather_in_place};
use crate::mask::shape::{CenteredTest, sweep_contains};
use rayon::prelude::*;

/// Shape, placement and edge softness of a wipe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaskSpec {
    pub shape: Shape,
    /// Normalised centre in `[0, 1]^2`; ignored by edge sweeps.
    pub center: (f64, f64),
    /// Feather width in pixels; 0 disables feathering.
    pub feather_radius: f32,
    pub feather_curve: FeatherCurve,
}

impl MaskSpec {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            center: (0.5, 0.5),
            feather_radius: 0.0,
            feather_curve: FeatherCurve::Linear,
        }
    }

    pub fn validate(&self) -> SlidewaveResult<()> {
        self.shape.validate()?;
        let (cx, cy) = self.center;
        if !((0.0..=1.0).contains(&cx) && (0.0..=1.0).contains(&cy)) {
            return Err(SlidewaveError::validation(format!(
                "mask center must be within [0, 1]^2, got ({cx}, {cy})"
            )));
        }
        if !(self.feather_radius.is_finite() && self.feather_radius >= 0.0) {
            return Err(SlidewaveError::validation(format!(
                "feather radius must be finite and >= 0, got {}",
                self.feather_radius
            )));
        }
        Ok(())
    }
}

/// Per-pixel coverage in `[0, 1]`, row-major.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoverageBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

impl CoverageBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; (width as usize) * (height as usize)],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data
            .resize((width as usize) * (height as usize), 0.0);
    }

    pub fn fill(&mut self, v: f32) {
        self.data.fill(v);
    }

    pub fn covered_fraction(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.data.iter().map(|&c| f64::from(c)).sum();
        sum / self.data.len() as f64
    }
}

/// Produces coverage buffers, reusing its allocation between frames.
#[derive(Debug, Default)]
pub struct MaskRasterizer {
    buffer: CoverageBuffer,
    scratch: FeatherScratch,
}

impl MaskRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rasterize `spec` at `progress` (clamped to `[0, 1]`) into the internal buffer.
    pub fn rasterize(
        &mut self,
        spec: &MaskSpec,
        progress: f64,
        width: u32,
        height: u32,
    ) -> SlidewaveResult<&CoverageBuffer> {
        if width == 0 || height == 0 {
            return Err(SlidewaveError::validation(
                "mask raster size must be non-zero",
            ));
        }
        self.buffer.resize(width, height);
        rasterize_into(spec, progress, &mut self.buffer);
        feather_in_place(
            &mut self.buffer.data,
            width as usize,
            height as usize,
            spec.feather_radius,
            spec.feather_curve,
            &mut self.scratch,
        );
        Ok(&self.buffer)
    }
}

/// Write the hard-edged shape coverage for `progress` into `out` (0 or 1 per pixel).
pub(crate) fn rasterize_into(spec: &MaskSpec, progress: f64, out: &mut CoverageBuffer) {
    let w = out.width as usize;
    let h = out.height as usize;
    if w == 0 || h == 0 {
        return;
    }
    let p = clamp01(progress);

    if !spec.shape.is_centered() {
        let shape = spec.shape;
        let (wf, hf) = (w as f64, h as f64);
        out.data.par_chunks_mut(w).enumerate().for_each(|(j, row)| {
            let v = (j as f64 + 0.5) / hf;
            for (i, c) in row.iter_mut().enumerate() {
                let u = (i as f64 + 0.5) / wf;
                *c = if sweep_contains(shape, u, v, p) { 1.0 } else { 0.0 };
            }
        });
        return;
    }

    let r = p * spec.shape.scale_constant();
    if r <= 0.0 {
        out.fill(0.0);
        return;
    }

    let cx = spec.center.0 * w as f64;
    let cy = spec.center.1 * h as f64;
    let s = normalizing_radius(cx, cy, w, h);
    let test = CenteredTest::new(spec.shape, r);
    out.data.par_chunks_mut(w).enumerate().for_each(|(j, row)| {
        let dy = (j as f64 - cy) / s;
        for (i, c) in row.iter_mut().enumerate() {
            let dx = (i as f64 - cx) / s;
            *c = if test.contains(dx, dy) { 1.0 } else { 0.0 };
        }
    });
}

/// Distance from the centre to the farthest pixel, never below one pixel.
fn normalizing_radius(cx: f64, cy: f64, w: usize, h: usize) -> f64 {
    let xs = [0.0, (w - 1) as f64];
    let ys = [0.0, (h - 1) as f64];
    let mut best: f64 = 1.0;
    for x in xs {
        for y in ys {
            best = best.max((x - cx).hypot(y - cy));
        }
    }
    best
}

#[cfg(test)]
#[path = "../../tests/unit/mask/rasterizer.rs"]
mod tests;
