pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub(crate) fn clamp01(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

pub(crate) fn clamp01_f32(x: f32) -> f32 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

/// Hermite smoothstep on `t` clamped to `[0, 1]`.
pub(crate) fn smoothstep(t: f32) -> f32 {
    let t = clamp01_f32(t);
    t * t * (3.0 - 2.0 * t)
}

/// Quantize a normalized channel to 8 bits with round-to-nearest.
pub(crate) fn unit_to_u8(v: f32) -> u8 {
    (clamp01_f32(v) * 255.0 + 0.5) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
