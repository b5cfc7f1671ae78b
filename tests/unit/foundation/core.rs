use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert!(Fps::integer(30).is_ok());
}

#[test]
fn frames_for_ms_round_matches_formula() {
    let fps = Fps::integer(30).unwrap();
    assert_eq!(fps.frames_for_ms_round(500), 15);
    assert_eq!(fps.frames_for_ms_round(3500), 105);
    assert_eq!(fps.frames_for_ms_round(0), 0);
    // 1003ms * 30 = 30.09 frames
    assert_eq!(fps.frames_for_ms_round(1003), 30);
    // 1017ms * 30 = 30.51 frames
    assert_eq!(fps.frames_for_ms_round(1017), 31);
}

#[test]
fn frames_for_ms_ceil_is_exact_on_multiples() {
    let fps = Fps::integer(30).unwrap();
    assert_eq!(fps.frames_for_ms_ceil(1000), 30);
    assert_eq!(fps.frames_for_ms_ceil(1003), 31);

    let ntsc = Fps::new(30000, 1001).unwrap();
    assert_eq!(ntsc.frames_for_ms_ceil(1001), 30);
}

#[test]
fn size_rejects_empty() {
    assert!(Size::new(0, 10).is_err());
    assert!(Size::new(10, 0).is_err());
    assert_eq!(Size::new(4, 3).unwrap(), Size { width: 4, height: 3 });
}

#[test]
fn rgb8_to_f32_is_normalized() {
    assert_eq!(Rgb8([255, 0, 51]).to_f32(), [1.0, 0.0, 0.2]);
    assert_eq!(Rgb8::default(), Rgb8::BLACK);
}

#[test]
fn direction_parses_and_normalizes_diagonals() {
    assert_eq!("top-left".parse::<Direction>().unwrap(), Direction::TopLeft);
    assert_eq!("Bottom".parse::<Direction>().unwrap(), Direction::Bottom);
    assert!("up".parse::<Direction>().is_err());

    assert_eq!(Direction::Top.unit(), Vec2::new(0.0, -1.0));
    assert_eq!(Direction::Center.unit(), Vec2::ZERO);
    let d = Direction::BottomRight.unit();
    assert!((d.hypot() - 1.0).abs() < 1e-12);
    assert!(Direction::Left.is_cardinal());
    assert!(!Direction::Center.is_cardinal());
}
