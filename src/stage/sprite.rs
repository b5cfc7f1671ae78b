use crate::foundation::core::{Affine, Point, Rect, Vec2};
use crate::foundation::error::{SlidewaveError, SlidewaveResult};

/// A slide image placed on the stage.
///
/// Transform order is scale, then rotation about the image centre, then translation by `offset`.
#[derive(Clone, Debug)]
pub struct Sprite {
    pub image: image::RgbImage,
    /// Translation in canvas pixels.
    pub offset: Vec2,
    pub scale: f64,
    /// Rotation in radians, clockwise on screen.
    pub rotation: f64,
    pub opacity: f64,
}

impl Sprite {
    pub fn new(image: image::RgbImage) -> Self {
        Self {
            image,
            offset: Vec2::ZERO,
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
        }
    }

    /// Restore the identity transform and full opacity.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.scale = 1.0;
        self.rotation = 0.0;
        self.opacity = 1.0;
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(f64::from(self.width()) / 2.0, f64::from(self.height()) / 2.0)
    }

    pub fn validate(&self) -> SlidewaveResult<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(SlidewaveError::validation(format!(
                "sprite scale must be finite and > 0, got {}",
                self.scale
            )));
        }
        if !self.offset.is_finite() || !self.rotation.is_finite() {
            return Err(SlidewaveError::validation(
                "sprite offset and rotation must be finite",
            ));
        }
        Ok(())
    }

    /// Source-to-canvas transform.
    pub fn transform(&self) -> Affine {
        let c = self.center();
        Affine::translate(self.offset + c)
            * Affine::rotate(self.rotation)
            * Affine::scale(self.scale)
            * Affine::translate(-c)
    }

    /// Canvas-space bounding box of the transformed image.
    pub fn bounds(&self) -> Rect {
        let t = self.transform();
        let (w, h) = (f64::from(self.width()), f64::from(self.height()));
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(0.0, h),
            Point::new(w, h),
        ];
        let mut bbox = Rect::from_points(t * corners[0], t * corners[0]);
        for p in &corners[1..] {
            bbox = bbox.union_pt(t * *p);
        }
        bbox
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/sprite.rs"]
mod tests;
