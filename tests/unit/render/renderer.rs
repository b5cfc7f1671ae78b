use super::*;
use crate::animation::ease::Ease;
use crate::effects::registry::EffectRegistry;
use crate::effects::transition::Transition;
use crate::effects::{EffectKind, EffectParams, Playback};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::SlidewaveError;
use crate::scene::model::EffectSpec;

fn size() -> Size {
    Size::new(8, 8).unwrap()
}

fn image() -> RgbImage {
    RgbImage::from_fn(8, 8, |x, y| image::Rgb([x as u8 * 30, y as u8 * 30, 200]))
}

fn plan(frames: [u64; 3]) -> SlidePlan {
    SlidePlan {
        index: 2,
        start: FrameIndex(0),
        frames,
    }
}

fn effect(phase: Phase, name: &str) -> Effect {
    let mut spec = EffectSpec::new(1000, name);
    if name != "none" {
        spec = spec.with_params(EffectParams::new().with("easing", "linear"));
    }
    EffectRegistry::global().resolve(phase, &spec).unwrap()
}

fn effects(names: [&str; 3]) -> [Effect; 3] {
    [
        effect(Phase::In, names[0]),
        effect(Phase::Hold, names[1]),
        effect(Phase::Out, names[2]),
    ]
}

fn canvas_matches_image(canvas: &Canvas, img: &RgbImage) -> bool {
    img.enumerate_pixels()
        .all(|(x, y, p)| canvas.pixel_rgb8(x, y) == p.0)
}

#[test]
fn produces_every_planned_frame_in_order() {
    let mut r = FrameRenderer::new(size(), Rgb8::BLACK);
    let mut frames = r
        .slide(&plan([15, 105, 15]), effects(["fade", "none", "fade"]), image())
        .unwrap();
    assert_eq!(frames.remaining(), 135);
    assert_eq!(frames.position(), Some((Phase::In, 0)));

    let mut count = 0;
    while frames.next_frame().unwrap().is_some() {
        count += 1;
    }
    assert_eq!(count, 135);
    assert_eq!(frames.remaining(), 0);
    assert_eq!(frames.position(), None);
    assert!(frames.next_frame().unwrap().is_none());
}

#[test]
fn fade_hits_both_endpoints_of_each_phase() {
    let img = image();
    let mut r = FrameRenderer::new(size(), Rgb8::BLACK);
    let mut frames = r
        .slide(&plan([3, 1, 3]), effects(["fade", "none", "fade"]), img.clone())
        .unwrap();

    let first = frames.next_frame().unwrap().unwrap();
    assert!(first.data.iter().all(|&c| c == 0.0));

    let mid = frames.next_frame().unwrap().unwrap();
    let (x, y) = (7, 7);
    let expected = f32::from(img.get_pixel(x, y).0[2]) / 255.0 * 0.5;
    assert!((mid.pixel(x, y)[2] - expected).abs() < 1e-5);

    let end_of_in = frames.next_frame().unwrap().unwrap();
    assert!(canvas_matches_image(end_of_in, &img));

    let hold = frames.next_frame().unwrap().unwrap();
    assert!(canvas_matches_image(hold, &img));

    let start_of_out = frames.next_frame().unwrap().unwrap();
    assert!(canvas_matches_image(start_of_out, &img));
    frames.next_frame().unwrap().unwrap();
    let last = frames.next_frame().unwrap().unwrap();
    assert!(last.data.iter().all(|&c| c == 0.0));
}

#[test]
fn zero_length_phases_are_skipped() {
    let mut r = FrameRenderer::new(size(), Rgb8::BLACK);
    let mut frames = r
        .slide(&plan([0, 2, 0]), effects(["fade", "none", "fade"]), image())
        .unwrap();
    assert_eq!(frames.position(), Some((Phase::Hold, 0)));
    assert_eq!(frames.remaining(), 2);
    assert!(frames.next_frame().unwrap().is_some());
    assert!(frames.next_frame().unwrap().is_some());
    assert!(frames.next_frame().unwrap().is_none());
}

#[test]
fn ken_burns_state_carries_into_out_phase() {
    let mut r = FrameRenderer::new(size(), Rgb8::BLACK);
    let mut frames = r
        .slide(&plan([2, 4, 3]), effects(["fade", "zoom_center", "fade"]), image())
        .unwrap();
    assert_eq!(frames.skip_frames(6), 6);
    assert!((frames.sprite.scale - 1.2).abs() < 1e-12);

    assert_eq!(frames.position(), Some((Phase::Out, 0)));
    frames.next_frame().unwrap().unwrap();
    assert!((frames.sprite.scale - 1.2).abs() < 1e-12);
    assert_eq!(frames.sprite.opacity, 1.0);
}

#[test]
fn skip_frames_stops_at_the_end() {
    let mut r = FrameRenderer::new(size(), Rgb8::BLACK);
    let mut frames = r
        .slide(&plan([1, 1, 1]), effects(["none", "none", "none"]), image())
        .unwrap();
    assert_eq!(frames.skip_frames(10), 3);
    assert!(frames.next_frame().unwrap().is_none());
}

#[test]
fn wipe_masks_are_applied_per_frame() {
    let img = image();
    let mut r = FrameRenderer::new(size(), Rgb8([10, 10, 10]));
    let mut frames = r
        .slide(&plan([2, 0, 0]), effects(["wipe_circle", "none", "none"]), img.clone())
        .unwrap();

    let first = frames.next_frame().unwrap().unwrap();
    assert!(first.data.iter().all(|&c| (c - 10.0 / 255.0).abs() < 1e-6));
    let last = frames.next_frame().unwrap().unwrap();
    assert!(canvas_matches_image(last, &img));
}

#[test]
fn images_are_fitted_once_at_load() {
    let big = RgbImage::from_pixel(32, 16, image::Rgb([40, 50, 60]));
    let mut r = FrameRenderer::new(size(), Rgb8::BLACK);
    let mut frames = r
        .slide(&plan([0, 1, 0]), effects(["none", "none", "none"]), big)
        .unwrap();
    assert_eq!(frames.sprite.image.dimensions(), (8, 8));
    let canvas = frames.next_frame().unwrap().unwrap();
    assert_eq!(canvas.pixel_rgb8(4, 4), [40, 50, 60]);
}

#[test]
fn errors_carry_slide_and_phase() {
    let broken = Effect {
        kind: EffectKind::Transition(Transition::Zoom {
            zoom_range: (0.0, 1.0),
        }),
        ease: Ease::Linear,
        playback: Playback::Forward,
    };
    let mut r = FrameRenderer::new(size(), Rgb8::BLACK);
    let mut frames = r
        .slide(
            &plan([0, 2, 0]),
            [Effect::stationary(), broken, Effect::stationary()],
            image(),
        )
        .unwrap();
    let err = frames.next_frame().unwrap_err();
    match err {
        SlidewaveError::Slide { index, phase, .. } => {
            assert_eq!(index, 2);
            assert_eq!(phase, Phase::Hold);
        }
        other => panic!("unexpected error: {other}"),
    }
}
