use crate::foundation::error::SlidewaveError;
use std::fmt;
use std::str::FromStr;

const SOLVE_EPSILON: f64 = 1e-7;
const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 64;

/// Cubic Bézier timing curve through `(0,0)`, `(p1x,p1y)`, `(p2x,p2y)`, `(1,1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    p1x: f64,
    p1y: f64,
    p2x: f64,
    p2y: f64,
    degenerate: bool,
}

impl CubicBezier {
    /// Build a curve. Non-finite points, or x points outside `[0, 1]`, evaluate as linear.
    /// Overshooting y points are allowed here but their output is clamped to `[0, 1]`.
    pub fn new(p1x: f64, p1y: f64, p2x: f64, p2y: f64) -> Self {
        let finite = [p1x, p1y, p2x, p2y].iter().all(|v| v.is_finite());
        let x_ok = (0.0..=1.0).contains(&p1x) && (0.0..=1.0).contains(&p2x);
        Self {
            p1x,
            p1y,
            p2x,
            p2y,
            degenerate: !(finite && x_ok),
        }
    }

    pub fn control_points(&self) -> [f64; 4] {
        [self.p1x, self.p1y, self.p2x, self.p2y]
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    fn sample_x(&self, t: f64) -> f64 {
        bezier_1d(self.p1x, self.p2x, t)
    }

    fn sample_y(&self, t: f64) -> f64 {
        bezier_1d(self.p1y, self.p2y, t)
    }

    fn sample_dx(&self, t: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * self.p1x + 6.0 * u * t * (self.p2x - self.p1x) + 3.0 * t * t * (1.0 - self.p2x)
    }

    fn solve_t(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = self.sample_x(t) - x;
            if err.abs() < SOLVE_EPSILON {
                return t.clamp(0.0, 1.0);
            }
            let d = self.sample_dx(t);
            if d.abs() < 1e-6 {
                break;
            }
            t -= err / d;
            if !(0.0..=1.0).contains(&t) {
                break;
            }
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..BISECTION_ITERATIONS {
            let v = self.sample_x(t);
            if (v - x).abs() < SOLVE_EPSILON {
                break;
            }
            if v < x {
                lo = t;
            } else {
                hi = t;
            }
            t = 0.5 * (lo + hi);
        }
        t.clamp(0.0, 1.0)
    }

    /// Evaluate `y` for progress `x` in `[0, 1]`.
    pub fn apply(&self, x: f64) -> f64 {
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
        if self.degenerate {
            return x;
        }
        if x == 0.0 || x == 1.0 {
            return x;
        }
        self.sample_y(self.solve_t(x)).clamp(0.0, 1.0)
    }
}

fn bezier_1d(a: f64, b: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * t * a + 3.0 * u * t * t * b + t * t * t
}

/// Named easing curves (CSS timing functions).
#[derive(Clone, Copy, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    #[default]
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    Bezier(CubicBezier),
}

impl Ease {
    pub fn curve(self) -> Option<CubicBezier> {
        match self {
            Self::Linear => None,
            Self::Ease => Some(CubicBezier::new(0.25, 0.1, 0.25, 1.0)),
            Self::EaseIn => Some(CubicBezier::new(0.42, 0.0, 1.0, 1.0)),
            Self::EaseOut => Some(CubicBezier::new(0.0, 0.0, 0.58, 1.0)),
            Self::EaseInOut => Some(CubicBezier::new(0.42, 0.0, 0.58, 1.0)),
            Self::Bezier(b) => Some(b),
        }
    }

    /// Apply this easing function to normalized progress `t`, clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        match self.curve() {
            None => {
                if t.is_nan() {
                    0.0
                } else {
                    t.clamp(0.0, 1.0)
                }
            }
            Some(b) => b.apply(t),
        }
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Ease => f.write_str("ease"),
            Self::EaseIn => f.write_str("ease-in"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::Bezier(b) => {
                let [a, c, d, e] = b.control_points();
                write!(f, "cubic-bezier({a}, {c}, {d}, {e})")
            }
        }
    }
}

impl FromStr for Ease {
    type Err = SlidewaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase();
        match norm.as_str() {
            "linear" => return Ok(Self::Linear),
            "ease" => return Ok(Self::Ease),
            "ease-in" | "ease_in" => return Ok(Self::EaseIn),
            "ease-out" | "ease_out" => return Ok(Self::EaseOut),
            "ease-in-out" | "ease_in_out" => return Ok(Self::EaseInOut),
            _ => {}
        }

        let Some(inner) = norm
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        else {
            return Err(SlidewaveError::validation(format!("unknown easing '{s}'")));
        };
        let values = inner
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SlidewaveError::validation(format!("bad cubic-bezier '{s}': {e}")))?;
        let &[a, b, c, d] = values.as_slice() else {
            return Err(SlidewaveError::validation(format!(
                "cubic-bezier expects 4 values, got {} in '{s}'",
                values.len()
            )));
        };
        if ![a, b, c, d].iter().all(|v| (0.0..=1.0).contains(v)) {
            return Err(SlidewaveError::validation(format!(
                "cubic-bezier control points must be within [0, 1], got '{s}'"
            )));
        }
        Ok(Self::Bezier(CubicBezier::new(a, b, c, d)))
    }
}

impl TryFrom<String> for Ease {
    type Error = SlidewaveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ease> for String {
    fn from(value: Ease) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
