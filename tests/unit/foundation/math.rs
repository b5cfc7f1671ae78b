use super::*;

#[test]
fn lerp_hits_endpoints() {
    assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
    assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
    assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
}

#[test]
fn clamp01_maps_nan_to_zero() {
    assert_eq!(clamp01(f64::NAN), 0.0);
    assert_eq!(clamp01(-1.0), 0.0);
    assert_eq!(clamp01(3.0), 1.0);
    assert_eq!(clamp01_f32(f32::NAN), 0.0);
}

#[test]
fn smoothstep_is_symmetric() {
    assert_eq!(smoothstep(0.0), 0.0);
    assert_eq!(smoothstep(1.0), 1.0);
    assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
    assert!((smoothstep(0.25) + smoothstep(0.75) - 1.0).abs() < 1e-6);
}

#[test]
fn unit_to_u8_rounds() {
    assert_eq!(unit_to_u8(0.0), 0);
    assert_eq!(unit_to_u8(1.0), 255);
    assert_eq!(unit_to_u8(0.5), 128);
    assert_eq!(unit_to_u8(2.0), 255);
}
