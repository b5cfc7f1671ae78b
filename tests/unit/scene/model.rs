use super::*;

const SHOW: &str = r#"{
  "width": 64,
  "height": 36,
  "fps": { "num": 30, "den": 1 },
  "background": [10, 20, 30],
  "slides": [
    {
      "image": "a.png",
      "in": { "duration_ms": 500, "effect": "wipe_circle", "params": { "feather": 8, "center": [0.5, 0.4] } },
      "hold": { "duration_ms": 3500, "effect": "pan_top_left" },
      "out": { "duration_ms": 500, "effect": "fade", "params": { "easing": "ease-in" } }
    }
  ]
}"#;

#[test]
fn parses_show_json() {
    let show = Show::from_json(SHOW).unwrap();
    assert_eq!(show.size().unwrap(), Size::new(64, 36).unwrap());
    assert_eq!(show.background, Rgb8([10, 20, 30]));
    assert_eq!(show.slides.len(), 1);
    let slide = &show.slides[0];
    assert_eq!(slide.effect(Phase::Hold).effect, "pan_top_left");
    assert!(slide.effect(Phase::Hold).params.is_empty());
    assert_eq!(slide.duration_ms(), 4500);
    assert_eq!(show.duration_ms(), 4500);
}

#[test]
fn background_defaults_to_black() {
    let json = SHOW.replace("\"background\": [10, 20, 30],", "");
    let show = Show::from_json(&json).unwrap();
    assert_eq!(show.background, Rgb8::BLACK);
}

#[test]
fn json_round_trips_through_pretty_printer() {
    let show = Show::from_json(SHOW).unwrap();
    let again = Show::from_json(&show.to_json_pretty().unwrap()).unwrap();
    assert_eq!(show, again);
}

#[test]
fn unknown_fields_are_rejected() {
    let json = SHOW.replace("\"width\": 64", "\"width\": 64, \"depth\": 3");
    let err = Show::from_json(&json).unwrap_err();
    assert!(matches!(err, SlidewaveError::Serde(_)));
}

#[test]
fn structural_validation() {
    let mut show = Show::from_json(SHOW).unwrap();
    show.width = 0;
    assert!(show.validate().unwrap_err().is_validation());

    let mut show = Show::from_json(SHOW).unwrap();
    show.fps = Fps { num: 30, den: 0 };
    assert!(show.validate().is_err());

    let mut show = Show::from_json(SHOW).unwrap();
    show.slides.clear();
    assert!(show.validate().is_err());

    let mut show = Show::from_json(SHOW).unwrap();
    show.slides[0].effect_out.effect = " ".to_owned();
    let msg = show.validate().unwrap_err().to_string();
    assert!(msg.contains("slide 0 (out)"));
}

#[test]
fn phase_names_are_lowercase() {
    assert_eq!(Phase::In.to_string(), "in");
    assert_eq!(serde_json::to_string(&Phase::Hold).unwrap(), "\"hold\"");
}
