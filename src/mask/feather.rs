use crate::foundation::error::SlidewaveError;
use crate::foundation::math::{clamp01_f32, smoothstep};
use rayon::prelude::*;

/// Squared-distance stand-in for "no site in reach".
const INF: f64 = 1e20;

/// Attenuation profile applied across the feather band.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatherCurve {
    #[default]
    Linear,
    Conic,
    Smoothstep,
    Sigmoid,
}

impl FeatherCurve {
    /// Map normalised depth `t = d / radius` to a coverage multiplier in `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => clamp01_f32(t),
            Self::Conic => clamp01_f32(t * t),
            Self::Smoothstep => smoothstep(t),
            Self::Sigmoid => {
                let lo = logistic(0.0);
                let hi = logistic(1.0);
                clamp01_f32((logistic(clamp01_f32(t)) - lo) / (hi - lo))
            }
        }
    }
}

const SIGMOID_STEEPNESS: f32 = 6.0;

fn logistic(t: f32) -> f32 {
    1.0 / (1.0 + (-SIGMOID_STEEPNESS * (t - 0.5)).exp())
}

impl std::str::FromStr for FeatherCurve {
    type Err = SlidewaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "conic" => Ok(Self::Conic),
            "smoothstep" => Ok(Self::Smoothstep),
            "sigmoid" => Ok(Self::Sigmoid),
            _ => Err(SlidewaveError::validation(format!(
                "unknown feather curve '{s}'"
            ))),
        }
    }
}

/// Reusable buffers for the distance transform.
#[derive(Debug, Default)]
pub(crate) struct FeatherScratch {
    rows: Vec<f64>,
    cols: Vec<f64>,
}

/// Soften the inner edge of a binary coverage mask in place.
///
/// Covered pixels closer than `radius` to an uncovered pixel are scaled by `curve(d / radius)`.
/// Pixels outside the canvas count as covered, so a full mask is left untouched.
pub(crate) fn feather_in_place(
    data: &mut [f32],
    width: usize,
    height: usize,
    radius: f32,
    curve: FeatherCurve,
    scratch: &mut FeatherScratch,
) {
    if radius <= 0.0 || width == 0 || height == 0 || data.len() != width * height {
        return;
    }
    // Nothing to attenuate when there is no edge.
    if !data.par_iter().any(|&c| c <= 0.0) || !data.par_iter().any(|&c| c > 0.0) {
        return;
    }

    let len = width * height;
    scratch.rows.resize(len, 0.0);
    scratch.cols.resize(len, 0.0);
    let FeatherScratch { rows, cols } = scratch;

    // Pass 1: per-row transform of the site function (0 on uncovered pixels).
    rows.par_chunks_mut(width)
        .zip(data.par_chunks(width))
        .for_each_init(
            || Edt1d::new(width),
            |edt, (out, cov)| {
                for (o, &c) in out.iter_mut().zip(cov) {
                    *o = if c > 0.0 { INF } else { 0.0 };
                }
                edt.run(out);
            },
        );

    // Pass 2: columns, computed on a transposed copy.
    let rows_ref: &[f64] = rows;
    cols.par_chunks_mut(height)
        .enumerate()
        .for_each_init(
            || Edt1d::new(height),
            |edt, (x, col)| {
                for (y, v) in col.iter_mut().enumerate() {
                    *v = rows_ref[y * width + x];
                }
                edt.run(col);
            },
        );

    let cols_ref: &[f64] = cols;
    let r = f64::from(radius);
    data.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, c) in row.iter_mut().enumerate() {
                if *c <= 0.0 {
                    continue;
                }
                let d2 = cols_ref[x * height + y];
                if d2 >= INF {
                    continue;
                }
                let d = d2.sqrt();
                if d < r {
                    *c = clamp01_f32(*c * curve.apply((d / r) as f32));
                }
            }
        });
}

/// Felzenszwalb-Huttenlocher lower envelope of parabolas, one line at a time.
struct Edt1d {
    v: Vec<usize>,
    z: Vec<f64>,
    f: Vec<f64>,
}

impl Edt1d {
    fn new(n: usize) -> Self {
        Self {
            v: vec![0; n],
            z: vec![0.0; n + 1],
            f: vec![0.0; n],
        }
    }

    /// Replace `line` (sampled site costs) with squared distances.
    fn run(&mut self, line: &mut [f64]) {
        let n = line.len();
        if n == 0 {
            return;
        }
        self.f[..n].copy_from_slice(line);
        let f = &self.f;
        let v = &mut self.v;
        let z = &mut self.z;

        let mut k = 0usize;
        v[0] = 0;
        z[0] = f64::NEG_INFINITY;
        z[1] = f64::INFINITY;
        for q in 1..n {
            let mut s = intersect(f, v[k], q);
            // z[0] is -inf, so this never walks past the first parabola.
            while s <= z[k] {
                k -= 1;
                s = intersect(f, v[k], q);
            }
            k += 1;
            v[k] = q;
            z[k] = s;
            z[k + 1] = f64::INFINITY;
        }

        k = 0;
        for (q, out) in line.iter_mut().enumerate() {
            let qf = q as f64;
            while z[k + 1] < qf {
                k += 1;
            }
            let p = v[k];
            let dq = qf - p as f64;
            *out = dq * dq + f[p];
        }
    }
}

/// Abscissa where the parabolas rooted at `p` and `q` (`p < q`) intersect.
fn intersect(f: &[f64], p: usize, q: usize) -> f64 {
    let (pf, qf) = (p as f64, q as f64);
    ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * (qf - pf))
}

#[cfg(test)]
#[path = "../../tests/unit/mask/feather.rs"]
mod tests;
