use super::*;
use crate::foundation::core::Vec2;
use crate::stage::canvas::PixelFormat;

fn pattern(w: u32, h: u32) -> image::RgbImage {
    image::RgbImage::from_fn(w, h, |x, y| {
        image::Rgb([(x * 37 % 256) as u8, (y * 53 % 256) as u8, ((x + y) * 11 % 256) as u8])
    })
}

fn solid(w: u32, h: u32, c: [u8; 3]) -> image::RgbImage {
    image::RgbImage::from_pixel(w, h, image::Rgb(c))
}

#[test]
fn identity_composite_reproduces_source_exactly() {
    let img = pattern(23, 17);
    let sprite = Sprite::new(img.clone());
    let mut stage = Stage::new(23, 17, Rgb8([9, 9, 9]));
    let canvas = stage
        .render(&[Layer {
            sprite: &sprite,
            mask: None,
        }])
        .unwrap();
    let out = canvas.to_rgb_image().unwrap();
    assert_eq!(out, img);
}

#[test]
fn opacity_blends_with_background() {
    let mut sprite = Sprite::new(solid(4, 4, [255, 255, 255]));
    sprite.opacity = 0.5;
    let mut stage = Stage::new(4, 4, Rgb8::BLACK);
    let canvas = stage
        .render(&[Layer {
            sprite: &sprite,
            mask: None,
        }])
        .unwrap();
    assert_eq!(canvas.pixel_rgb8(1, 1), [128, 128, 128]);
}

#[test]
fn zero_opacity_leaves_background() {
    let mut sprite = Sprite::new(solid(4, 4, [255, 0, 0]));
    sprite.opacity = 0.0;
    let mut stage = Stage::new(4, 4, Rgb8([1, 2, 3]));
    let canvas = stage
        .render(&[Layer {
            sprite: &sprite,
            mask: None,
        }])
        .unwrap();
    assert!(canvas.data.chunks(3).all(|p| p == Rgb8([1, 2, 3]).to_f32()));
}

#[test]
fn mask_is_sampled_at_destination_pixel() {
    let mut sprite = Sprite::new(solid(8, 8, [200, 100, 50]));
    // Moving the sprite must not move the mask.
    sprite.offset = Vec2::new(-2.0, 0.0);
    let mut mask = CoverageBuffer::new(8, 8);
    for y in 0..8 {
        for x in 0..8 {
            mask.data[y * 8 + x] = if x == 3 { 1.0 } else { 0.0 };
        }
    }
    let mut stage = Stage::new(8, 8, Rgb8::BLACK);
    let canvas = stage
        .render(&[Layer {
            sprite: &sprite,
            mask: Some(&mask),
        }])
        .unwrap();
    for y in 0..8 {
        for x in 0..8 {
            let expect = if x == 3 { [200, 100, 50] } else { [0, 0, 0] };
            assert_eq!(canvas.pixel_rgb8(x, y), expect, "({x}, {y})");
        }
    }
}

#[test]
fn partial_coverage_scales_alpha() {
    let sprite = Sprite::new(solid(2, 2, [255, 255, 255]));
    let mut mask = CoverageBuffer::new(2, 2);
    mask.fill(0.25);
    let mut stage = Stage::new(2, 2, Rgb8::BLACK);
    let canvas = stage
        .render(&[Layer {
            sprite: &sprite,
            mask: Some(&mask),
        }])
        .unwrap();
    assert_eq!(canvas.pixel_rgb8(0, 0), [64, 64, 64]);
}

#[test]
fn mask_size_mismatch_is_an_error() {
    let sprite = Sprite::new(solid(4, 4, [1, 1, 1]));
    let mask = CoverageBuffer::new(3, 4);
    let mut canvas = Canvas::new(4, 4);
    let err = composite(
        &mut canvas,
        &Layer {
            sprite: &sprite,
            mask: Some(&mask),
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("evaluation error"));
}

#[test]
fn translated_sprite_uncovers_background() {
    let mut sprite = Sprite::new(solid(10, 4, [255, 0, 0]));
    sprite.offset = Vec2::new(5.0, 0.0);
    let mut stage = Stage::new(10, 4, Rgb8([0, 0, 255]));
    let canvas = stage
        .render(&[Layer {
            sprite: &sprite,
            mask: None,
        }])
        .unwrap();
    assert_eq!(canvas.pixel_rgb8(2, 1), [0, 0, 255]);
    assert_eq!(canvas.pixel_rgb8(7, 1), [255, 0, 0]);
}

#[test]
fn offscreen_sprite_is_skipped() {
    let mut sprite = Sprite::new(solid(4, 4, [255, 0, 0]));
    sprite.offset = Vec2::new(100.0, 100.0);
    let mut stage = Stage::new(4, 4, Rgb8::BLACK);
    let canvas = stage
        .render(&[Layer {
            sprite: &sprite,
            mask: None,
        }])
        .unwrap();
    assert!(canvas.data.iter().all(|&v| v == 0.0));
}

#[test]
fn each_render_starts_from_a_clear_canvas() {
    let mut sprite = Sprite::new(solid(4, 4, [255, 255, 255]));
    sprite.opacity = 0.5;
    let mut stage = Stage::new(4, 4, Rgb8::BLACK);
    let layer = [Layer {
        sprite: &sprite,
        mask: None,
    }];
    let first = stage.render(&layer).unwrap().clone();
    let second = stage.render(&layer).unwrap();
    assert_eq!(&first, second);
}

#[test]
fn rotation_keeps_centre_pixel() {
    let img = pattern(21, 21);
    let mut sprite = Sprite::new(img.clone());
    sprite.rotation = 0.7;
    let mut stage = Stage::new(21, 21, Rgb8::BLACK);
    let canvas = stage
        .render(&[Layer {
            sprite: &sprite,
            mask: None,
        }])
        .unwrap();
    let mut bytes = Vec::new();
    canvas.write_bytes(PixelFormat::Rgb24, &mut bytes);
    let centre = (10 * 21 + 10) * 3;
    assert_eq!(&bytes[centre..centre + 3], &img.get_pixel(10, 10).0);
}
