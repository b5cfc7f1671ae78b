use crate::foundation::core::Direction;
use crate::foundation::error::{SlidewaveError, SlidewaveResult};
use std::f64::consts::{PI, SQRT_2};

/// Extra reach so the boundary pixels are covered at full progress despite rounding.
const REACH_MARGIN: f64 = 1e-6;

pub const DEFAULT_STAR_INNER_RATIO: f64 = 0.4;
pub const DEFAULT_CROSS_ARM_RATIO: f64 = 0.3;
pub const DEFAULT_BLINDS_COUNT: u32 = 10;

/// Vertical shift applied to the heart curve so its visual centre sits on the mask centre.
const HEART_Y_OFFSET: f64 = 0.12;
/// Lower bound for the radius of the disc inscribed in the shifted heart curve (measured 0.877).
const HEART_INRADIUS: f64 = 0.86;

/// Stripe orientation for blinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Horizontal stripes that open top to bottom.
    Horizontal,
    /// Vertical stripes that open left to right.
    Vertical,
}

impl std::str::FromStr for Orientation {
    type Err = SlidewaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(Self::Horizontal),
            "vertical" | "v" => Ok(Self::Vertical),
            _ => Err(SlidewaveError::validation(format!(
                "unknown orientation '{s}'"
            ))),
        }
    }
}

/// Procedural wipe shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Circle,
    Diamond,
    /// Edge sweep starting at `from`; diagonal directions sweep both axes.
    Rect { from: Direction },
    /// Equilateral triangle, apex up.
    Triangle,
    /// Five-pointed star, first point up.
    Star { inner_ratio: f64 },
    Heart,
    /// Plus sign with arms of half-width `arm_ratio` relative to the arm length.
    Cross { arm_ratio: f64 },
    Blinds { count: u32, orientation: Orientation },
}

impl Shape {
    pub fn validate(&self) -> SlidewaveResult<()> {
        match *self {
            Self::Rect { from } if from == Direction::Center => Err(SlidewaveError::validation(
                "rect wipe needs an edge or corner direction, not 'center'",
            )),
            Self::Star { inner_ratio } => {
                let max = (PI / 5.0).cos();
                if !(inner_ratio > 0.0 && inner_ratio <= max) {
                    return Err(SlidewaveError::validation(format!(
                        "star inner_ratio must be in (0, {max:.4}], got {inner_ratio}"
                    )));
                }
                Ok(())
            }
            Self::Cross { arm_ratio } => {
                if !(arm_ratio > 0.0 && arm_ratio <= 1.0) {
                    return Err(SlidewaveError::validation(format!(
                        "cross arm_ratio must be in (0, 1], got {arm_ratio}"
                    )));
                }
                Ok(())
            }
            Self::Blinds { count, .. } if count == 0 => {
                Err(SlidewaveError::validation("blinds count must be >= 1"))
            }
            _ => Ok(()),
        }
    }

    /// Size at progress 1 that makes the shape cover the unit disc.
    pub fn scale_constant(&self) -> f64 {
        let k = match *self {
            Self::Circle => 1.0,
            Self::Diamond => SQRT_2,
            Self::Rect { .. } | Self::Blinds { .. } => 1.0,
            Self::Triangle => 2.0,
            Self::Star { inner_ratio } => 1.0 / inner_ratio,
            Self::Heart => 1.0 / HEART_INRADIUS,
            Self::Cross { arm_ratio } => (1.0 / (arm_ratio * SQRT_2)).max(1.0),
        };
        k + REACH_MARGIN
    }

    /// True for shapes laid out around the mask centre; edge sweeps ignore it.
    pub fn is_centered(&self) -> bool {
        !matches!(self, Self::Rect { .. } | Self::Blinds { .. })
    }
}

/// Membership test for a centred shape at size `r`, on normalised offsets (y down).
pub(crate) struct CenteredTest {
    shape: Shape,
    r: f64,
    star: [(f64, f64); 10],
}

impl CenteredTest {
    pub(crate) fn new(shape: Shape, r: f64) -> Self {
        let star = match shape {
            Shape::Star { inner_ratio } => star_vertices(r, inner_ratio),
            _ => [(0.0, 0.0); 10],
        };
        Self { shape, r, star }
    }

    pub(crate) fn contains(&self, dx: f64, dy: f64) -> bool {
        let r = self.r;
        match self.shape {
            Shape::Circle => dx * dx + dy * dy <= r * r,
            Shape::Diamond => dx.abs() + dy.abs() <= r,
            Shape::Triangle => {
                let x = dx;
                let y = -dy;
                let inradius = 0.5 * r;
                let c30 = 3f64.sqrt() * 0.5;
                -y <= inradius && x * c30 + 0.5 * y <= inradius && -x * c30 + 0.5 * y <= inradius
            }
            Shape::Star { .. } => point_in_polygon(dx, dy, &self.star),
            Shape::Heart => {
                let x = dx / r;
                let y = -dy / r + HEART_Y_OFFSET;
                let a = x * x + y * y - 1.0;
                a * a * a - x * x * y * y * y <= 0.0
            }
            Shape::Cross { arm_ratio } => {
                let (ax, ay) = (dx.abs(), dy.abs());
                let half = arm_ratio * r;
                (ax <= r && ay <= half) || (ay <= r && ax <= half)
            }
            Shape::Rect { .. } | Shape::Blinds { .. } => false,
        }
    }
}

/// Membership for edge sweeps on pixel-centre coordinates `u = (i + 0.5) / W`, `v = (j + 0.5) / H`.
pub(crate) fn sweep_contains(shape: Shape, u: f64, v: f64, p: f64) -> bool {
    match shape {
        Shape::Rect { from } => {
            let (sx, sy) = from.step();
            let along_x = match sx {
                -1 => u,
                1 => 1.0 - u,
                _ => 0.0,
            };
            let along_y = match sy {
                -1 => v,
                1 => 1.0 - v,
                _ => 0.0,
            };
            match (sx, sy) {
                (0, _) => along_y < p,
                (_, 0) => along_x < p,
                _ => along_x < p && along_y < p,
            }
        }
        Shape::Blinds { count, orientation } => {
            let t = match orientation {
                Orientation::Horizontal => v,
                Orientation::Vertical => u,
            };
            (t * f64::from(count)).fract() < p
        }
        _ => false,
    }
}

/// Ten alternating outer/inner vertices, first outer vertex pointing up (angle -90 deg, y down).
fn star_vertices(r: f64, inner_ratio: f64) -> [(f64, f64); 10] {
    let mut out = [(0.0, 0.0); 10];
    for (m, v) in out.iter_mut().enumerate() {
        let radius = if m % 2 == 0 { r } else { r * inner_ratio };
        let angle = -PI / 2.0 + (m as f64) * PI / 5.0;
        *v = (radius * angle.cos(), radius * angle.sin());
    }
    out
}

/// Even-odd ray cast towards +x.
pub(crate) fn point_in_polygon(x: f64, y: f64, verts: &[(f64, f64)]) -> bool {
    let Some(mut j) = verts.len().checked_sub(1) else {
        return false;
    };
    let mut inside = false;
    for (i, &(xi, yi)) in verts.iter().enumerate() {
        let (xj, yj) = verts[j];
        if (yi > y) != (yj > y) {
            let x_cross = xi + (y - yi) * (xj - xi) / (yj - yi);
            if x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
#[path = "../../tests/unit/mask/shape.rs"]
mod tests;
