use super::*;
use crate::effects::registry::EffectRegistry;
use crate::scene::model::EffectSpec;

fn linear(name: &str, phase: Phase) -> Effect {
    let spec = EffectSpec::new(500, name).with_params(EffectParams::new().with("easing", "linear"));
    EffectRegistry::global().resolve(phase, &spec).unwrap()
}

#[test]
fn fade_in_with_linear_easing() {
    let ctx = EffectContext::new(10, 10);
    let fade = linear("fade", Phase::In);
    assert_eq!(fade.evaluate(0.0, &ctx).opacity, Some(0.0));
    assert_eq!(fade.evaluate(0.5, &ctx).opacity, Some(0.5));
    assert_eq!(fade.evaluate(1.0, &ctx).opacity, Some(1.0));
}

#[test]
fn fade_out_runs_backwards() {
    let ctx = EffectContext::new(10, 10);
    let fade = linear("fade", Phase::Out);
    assert_eq!(fade.evaluate(0.0, &ctx).opacity, Some(1.0));
    assert_eq!(fade.evaluate(0.5, &ctx).opacity, Some(0.5));
    assert_eq!(fade.evaluate(1.0, &ctx).opacity, Some(0.0));
}

#[test]
fn ken_burns_is_never_reversed() {
    let ctx = EffectContext::new(100, 100);
    let pan = linear("pan_right", Phase::Out);
    assert_eq!(pan.evaluate(0.0, &ctx).scale, Some(1.0));
    assert_eq!(pan.evaluate(1.0, &ctx).scale, Some(1.2));
}

#[test]
fn progress_outside_unit_is_clamped() {
    let ctx = EffectContext::new(10, 10);
    let fade = linear("fade", Phase::In);
    assert_eq!(fade.evaluate(-2.0, &ctx).opacity, Some(0.0));
    assert_eq!(fade.evaluate(9.0, &ctx).opacity, Some(1.0));
}

#[test]
fn static_changes_nothing() {
    let ctx = EffectContext::new(10, 10);
    assert_eq!(
        Effect::stationary().evaluate(0.3, &ctx),
        TransformDelta::default()
    );
}

#[test]
fn delta_keeps_unset_fields() {
    let mut sprite = Sprite::new(image::RgbImage::new(2, 2));
    sprite.scale = 1.2;
    sprite.offset = Vec2::new(3.0, 4.0);
    TransformDelta {
        opacity: Some(0.25),
        ..TransformDelta::default()
    }
    .apply_to(&mut sprite);
    assert_eq!(sprite.scale, 1.2);
    assert_eq!(sprite.offset, Vec2::new(3.0, 4.0));
    assert_eq!(sprite.opacity, 0.25);

    TransformDelta {
        opacity: Some(4.0),
        ..TransformDelta::default()
    }
    .apply_to(&mut sprite);
    assert_eq!(sprite.opacity, 1.0);
}
