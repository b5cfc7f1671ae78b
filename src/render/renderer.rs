use crate::assets::image::fit_cover;
use crate::effects::{Effect, EffectContext, MaskRequest};
use crate::foundation::core::{Rgb8, Size};
use crate::foundation::error::SlidewaveResult;
use crate::mask::MaskRasterizer;
use crate::scene::model::Phase;
use crate::scene::timeline::{SlidePlan, phase_progress};
use crate::stage::canvas::Canvas;
use crate::stage::compose::{Layer, Stage};
use crate::stage::sprite::Sprite;
use image::RgbImage;

/// Owns the stage and mask scratch shared by every slide of a show.
#[derive(Debug)]
pub struct FrameRenderer {
    stage: Stage,
    rasterizer: MaskRasterizer,
    ctx: EffectContext,
    size: Size,
}

impl FrameRenderer {
    pub fn new(size: Size, background: Rgb8) -> Self {
        Self {
            stage: Stage::new(size.width, size.height, background),
            rasterizer: MaskRasterizer::new(),
            ctx: EffectContext::new(size.width, size.height),
            size,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Start producing the frames of one slide.
    ///
    /// `image` is resized to cover the canvas and centre-cropped once, here.
    pub fn slide(
        &mut self,
        plan: &SlidePlan,
        effects: [Effect; 3],
        image: RgbImage,
    ) -> SlidewaveResult<SlideFrames<'_>> {
        let image = if image.dimensions() == (self.size.width, self.size.height) {
            image
        } else {
            fit_cover(&image, self.size).map_err(|e| e.in_slide(plan.index, Phase::In))?
        };
        Ok(SlideFrames {
            renderer: self,
            sprite: Sprite::new(image),
            index: plan.index,
            frames: plan.frames,
            effects,
            phase: 0,
            k: 0,
            mask: None,
        })
    }
}

/// Lazy, forward-only frame sequence of one slide: in, then hold, then out.
///
/// Sprite state carries over between phases; an effect only overwrites the fields it drives.
#[derive(Debug)]
pub struct SlideFrames<'a> {
    renderer: &'a mut FrameRenderer,
    sprite: Sprite,
    index: usize,
    frames: [u64; 3],
    effects: [Effect; 3],
    /// Current phase slot, 3 once exhausted.
    phase: usize,
    /// Next frame within the current phase.
    k: u64,
    mask: Option<MaskRequest>,
}

impl SlideFrames<'_> {
    pub fn slide_index(&self) -> usize {
        self.index
    }

    /// Frames not yet produced.
    pub fn remaining(&self) -> u64 {
        self.frames
            .iter()
            .enumerate()
            .skip(self.phase)
            .map(|(slot, &n)| if slot == self.phase { n.saturating_sub(self.k) } else { n })
            .sum()
    }

    /// Phase and phase-local index of the next frame, or `None` when finished.
    pub fn position(&mut self) -> Option<(Phase, u64)> {
        self.settle();
        Phase::ALL.get(self.phase).map(|&p| (p, self.k))
    }

    /// Compose the next frame. The canvas is borrowed until the next call.
    pub fn next_frame(&mut self) -> SlidewaveResult<Option<&Canvas>> {
        let Some(phase) = self.step() else {
            return Ok(None);
        };
        let index = self.index;
        self.compose()
            .map(Some)
            .map_err(|e| e.in_slide(index, phase))
    }

    /// Advance up to `n` frames, updating sprite state without drawing. Returns the number skipped.
    pub fn skip_frames(&mut self, n: u64) -> u64 {
        let mut skipped = 0;
        while skipped < n && self.step().is_some() {
            skipped += 1;
        }
        skipped
    }

    fn settle(&mut self) {
        while self.phase < 3 && self.k >= self.frames[self.phase] {
            self.phase += 1;
            self.k = 0;
        }
    }

    /// Evaluate the next frame's effect into the sprite and advance the cursor.
    fn step(&mut self) -> Option<Phase> {
        self.settle();
        let phase = *Phase::ALL.get(self.phase)?;
        let n = self.frames[self.phase];
        if self.k == 0 {
            tracing::debug!(slide = self.index, phase = %phase, frames = n, "phase start");
        }
        let p = phase_progress(self.k, n);
        let delta = self.effects[self.phase].evaluate(p, &self.renderer.ctx);
        delta.apply_to(&mut self.sprite);
        self.mask = delta.mask;
        self.k += 1;
        Some(phase)
    }

    fn compose(&mut self) -> SlidewaveResult<&Canvas> {
        let r = &mut *self.renderer;
        let mask = match &self.mask {
            Some(req) => Some(r.rasterizer.rasterize(
                &req.spec,
                req.progress,
                r.size.width,
                r.size.height,
            )?),
            None => None,
        };
        r.stage.render(&[Layer {
            sprite: &self.sprite,
            mask,
        }])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
