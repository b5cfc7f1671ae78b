use crate::effects::params::EffectParams;
use crate::effects::{EffectContext, MaskRequest, TransformDelta};
use crate::foundation::core::{Direction, Vec2};
use crate::foundation::error::{SlidewaveError, SlidewaveResult};
use crate::foundation::math::lerp;
use crate::mask::shape::{
    DEFAULT_BLINDS_COUNT, DEFAULT_CROSS_ARM_RATIO, DEFAULT_STAR_INNER_RATIO,
};
use crate::mask::{FeatherCurve, MaskSpec, Orientation, Shape};

pub const DEFAULT_ANGLE_RANGE: (f64, f64) = (0.0, 360.0);
pub const DEFAULT_ROTATE_SCALE_RANGE: (f64, f64) = (0.5, 1.0);
pub const DEFAULT_ZOOM_RANGE: (f64, f64) = (0.5, 1.0);

const WIPE_KEYS: [&str; 4] = ["easing", "center", "feather", "feather_curve"];

/// Entrance/exit transitions, driven by eased progress `e` (0 = hidden, 1 = fully shown).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transition {
    Fade,
    /// Angles in degrees, counter-clockwise on screen.
    Rotate {
        angle_range: (f64, f64),
        scale_range: (f64, f64),
    },
    Slide {
        from: Direction,
    },
    Zoom {
        zoom_range: (f64, f64),
    },
    Wipe {
        mask: MaskSpec,
    },
}

impl Transition {
    pub fn evaluate(&self, e: f64, ctx: &EffectContext) -> TransformDelta {
        match *self {
            Self::Fade => TransformDelta {
                opacity: Some(e),
                ..TransformDelta::default()
            },
            Self::Rotate {
                angle_range,
                scale_range,
            } => {
                let angle = lerp(angle_range.0, angle_range.1, e);
                let scale = lerp(scale_range.0, scale_range.1, e);
                TransformDelta {
                    rotation: Some(-angle.to_radians()),
                    scale: Some(scale),
                    opacity: Some(scale.min(1.0)),
                    ..TransformDelta::default()
                }
            }
            Self::Slide { from } => {
                let remaining = 1.0 - e;
                let offset = match from {
                    Direction::Top => Vec2::new(0.0, -ctx.height * remaining),
                    Direction::Bottom => Vec2::new(0.0, ctx.height * remaining),
                    Direction::Right => Vec2::new(ctx.width * remaining, 0.0),
                    _ => Vec2::new(-ctx.width * remaining, 0.0),
                };
                TransformDelta {
                    offset: Some(offset),
                    ..TransformDelta::default()
                }
            }
            Self::Zoom { zoom_range } => TransformDelta {
                scale: Some(lerp(zoom_range.0, zoom_range.1, e)),
                ..TransformDelta::default()
            },
            Self::Wipe { mask } => TransformDelta {
                mask: Some(MaskRequest { spec: mask, progress: e }),
                ..TransformDelta::default()
            },
        }
    }
}

pub(crate) fn fade(params: &EffectParams) -> SlidewaveResult<Transition> {
    params.ensure_only(&["easing"])?;
    Ok(Transition::Fade)
}

pub(crate) fn rotate(params: &EffectParams) -> SlidewaveResult<Transition> {
    params.ensure_only(&["easing", "angle_range", "scale_range"])?;
    let angle_range = params.pair_or("angle_range", DEFAULT_ANGLE_RANGE)?;
    let scale_range = positive_range(params, "scale_range", DEFAULT_ROTATE_SCALE_RANGE)?;
    Ok(Transition::Rotate {
        angle_range,
        scale_range,
    })
}

pub(crate) fn slide(params: &EffectParams) -> SlidewaveResult<Transition> {
    params.ensure_only(&["easing", "direction"])?;
    let from = params.parse_or("direction", Direction::Left)?;
    if !from.is_cardinal() {
        return Err(SlidewaveError::validation(format!(
            "slide direction must be top, bottom, left or right, got '{from}'"
        )));
    }
    Ok(Transition::Slide { from })
}

pub(crate) fn zoom(params: &EffectParams) -> SlidewaveResult<Transition> {
    params.ensure_only(&["easing", "zoom_range"])?;
    Ok(Transition::Zoom {
        zoom_range: positive_range(params, "zoom_range", DEFAULT_ZOOM_RANGE)?,
    })
}

/// Wipe variants share the placement and feather keys; `extra` names shape-specific ones.
pub(crate) fn wipe(
    params: &EffectParams,
    extra: &[&str],
    shape: impl FnOnce(&EffectParams) -> SlidewaveResult<Shape>,
) -> SlidewaveResult<Transition> {
    let allowed: Vec<&str> = WIPE_KEYS.iter().chain(extra).copied().collect();
    params.ensure_only(&allowed)?;
    let mut mask = MaskSpec::new(shape(params)?);
    mask.center = params.pair_or("center", (0.5, 0.5))?;
    mask.feather_radius = params.number_or("feather", 0.0)? as f32;
    mask.feather_curve = params.parse_or("feather_curve", FeatherCurve::Linear)?;
    mask.validate()?;
    Ok(Transition::Wipe { mask })
}

pub(crate) fn rect_shape(params: &EffectParams) -> SlidewaveResult<Shape> {
    Ok(Shape::Rect {
        from: params.parse_or("direction", Direction::Left)?,
    })
}

pub(crate) fn star_shape(params: &EffectParams) -> SlidewaveResult<Shape> {
    Ok(Shape::Star {
        inner_ratio: params.number_or("inner_ratio", DEFAULT_STAR_INNER_RATIO)?,
    })
}

pub(crate) fn cross_shape(params: &EffectParams) -> SlidewaveResult<Shape> {
    Ok(Shape::Cross {
        arm_ratio: params.number_or("arm_ratio", DEFAULT_CROSS_ARM_RATIO)?,
    })
}

pub(crate) fn blinds_shape(params: &EffectParams) -> SlidewaveResult<Shape> {
    Ok(Shape::Blinds {
        count: params.count_or("count", DEFAULT_BLINDS_COUNT)?,
        orientation: params.parse_or("orientation", Orientation::Horizontal)?,
    })
}

pub(crate) fn positive_range(
    params: &EffectParams,
    key: &str,
    default: (f64, f64),
) -> SlidewaveResult<(f64, f64)> {
    let (a, b) = params.pair_or(key, default)?;
    if a <= 0.0 || b <= 0.0 {
        return Err(SlidewaveError::validation(format!(
            "parameter '{key}' must be positive, got ({a}, {b})"
        )));
    }
    Ok((a, b))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transition.rs"]
mod tests;
