use crate::effects::params::EffectParams;
use crate::effects::transition::positive_range;
use crate::effects::{EffectContext, TransformDelta};
use crate::foundation::core::{Direction, Vec2};
use crate::foundation::error::{SlidewaveError, SlidewaveResult};
use crate::foundation::math::lerp;

pub const DEFAULT_ZOOM_RANGE: (f64, f64) = (1.0, 1.2);
pub const DEFAULT_PAN_INTENSITY: f64 = 0.1;

/// Slow pan and zoom across the slide while it is held on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KenBurns {
    /// Pan direction; `Center` only zooms.
    pub direction: Direction,
    pub zoom_range: (f64, f64),
    /// Pan distance as a fraction of the canvas size.
    pub pan_intensity: f64,
}

impl KenBurns {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            zoom_range: DEFAULT_ZOOM_RANGE,
            pan_intensity: DEFAULT_PAN_INTENSITY,
        }
    }

    pub fn from_params(direction: Direction, params: &EffectParams) -> SlidewaveResult<Self> {
        params.ensure_only(&["easing", "zoom_range", "pan_intensity"])?;
        let pan_intensity = params.number_or("pan_intensity", DEFAULT_PAN_INTENSITY)?;
        if pan_intensity < 0.0 {
            return Err(SlidewaveError::validation(format!(
                "parameter 'pan_intensity' must be >= 0, got {pan_intensity}"
            )));
        }
        Ok(Self {
            direction,
            zoom_range: positive_range(params, "zoom_range", DEFAULT_ZOOM_RANGE)?,
            pan_intensity,
        })
    }

    pub fn evaluate(&self, e: f64, ctx: &EffectContext) -> TransformDelta {
        let unit = self.direction.unit();
        let pan = Vec2::new(
            unit.x * ctx.width * self.pan_intensity * e,
            unit.y * ctx.height * self.pan_intensity * e,
        );
        TransformDelta {
            offset: Some(pan),
            scale: Some(lerp(self.zoom_range.0, self.zoom_range.1, e)),
            ..TransformDelta::default()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/kenburns.rs"]
mod tests;
