use super::*;
use crate::foundation::core::Direction;

fn all_shapes() -> Vec<Shape> {
    let mut shapes = vec![
        Shape::Circle,
        Shape::Diamond,
        Shape::Triangle,
        Shape::Star {
            inner_ratio: shape::DEFAULT_STAR_INNER_RATIO,
        },
        Shape::Heart,
        Shape::Cross {
            arm_ratio: shape::DEFAULT_CROSS_ARM_RATIO,
        },
        Shape::Blinds {
            count: 6,
            orientation: Orientation::Horizontal,
        },
        Shape::Blinds {
            count: 5,
            orientation: Orientation::Vertical,
        },
    ];
    for d in Direction::ALL {
        if d != Direction::Center {
            shapes.push(Shape::Rect { from: d });
        }
    }
    shapes
}

fn centers() -> [(f64, f64); 4] {
    [(0.5, 0.5), (0.0, 0.0), (1.0, 0.3), (0.2, 0.9)]
}

#[test]
fn every_shape_is_empty_at_zero_and_full_at_one() {
    let mut rast = MaskRasterizer::new();
    for shape in all_shapes() {
        for center in centers() {
            for (w, h) in [(64, 36), (31, 47)] {
                let spec = MaskSpec {
                    center,
                    ..MaskSpec::new(shape)
                };
                spec.validate().unwrap();

                let empty = rast.rasterize(&spec, 0.0, w, h).unwrap();
                assert!(
                    empty.data.iter().all(|&c| c.abs() < 1e-3),
                    "{shape:?} at {center:?} not empty at p=0"
                );

                let full = rast.rasterize(&spec, 1.0, w, h).unwrap();
                assert!(
                    full.data.iter().all(|&c| (c - 1.0).abs() < 1e-3),
                    "{shape:?} at {center:?} not full at p=1"
                );
            }
        }
    }
}

#[test]
fn feathered_shapes_keep_endpoints() {
    let mut rast = MaskRasterizer::new();
    for shape in all_shapes() {
        for curve in [
            FeatherCurve::Linear,
            FeatherCurve::Conic,
            FeatherCurve::Smoothstep,
            FeatherCurve::Sigmoid,
        ] {
            let spec = MaskSpec {
                feather_radius: 12.0,
                feather_curve: curve,
                ..MaskSpec::new(shape)
            };
            let full = rast.rasterize(&spec, 1.0, 40, 30).unwrap();
            assert!(full.data.iter().all(|&c| (c - 1.0).abs() < 1e-3));
            let empty = rast.rasterize(&spec, 0.0, 40, 30).unwrap();
            assert!(empty.data.iter().all(|&c| c.abs() < 1e-3));
        }
    }
}

#[test]
fn coverage_grows_with_progress() {
    let mut rast = MaskRasterizer::new();
    for shape in all_shapes() {
        let spec = MaskSpec::new(shape);
        let mut prev = 0.0;
        for k in 0..=10 {
            let p = f64::from(k) / 10.0;
            let frac = rast.rasterize(&spec, p, 48, 32).unwrap().covered_fraction();
            assert!(frac + 1e-9 >= prev, "{shape:?} shrank at p={p}");
            prev = frac;
        }
    }
}

#[test]
fn rect_from_top_covers_upper_half_at_midpoint() {
    let mut rast = MaskRasterizer::new();
    let spec = MaskSpec::new(Shape::Rect {
        from: Direction::Top,
    });
    let buf = rast.rasterize(&spec, 0.5, 10, 10).unwrap();
    for y in 0..10 {
        for x in 0..10 {
            let expect = if y < 5 { 1.0 } else { 0.0 };
            assert_eq!(buf.get(x, y), expect, "({x}, {y})");
        }
    }
}

#[test]
fn rect_from_corner_sweeps_both_axes() {
    let mut rast = MaskRasterizer::new();
    let spec = MaskSpec::new(Shape::Rect {
        from: Direction::BottomRight,
    });
    let buf = rast.rasterize(&spec, 0.5, 8, 8).unwrap();
    assert_eq!(buf.get(7, 7), 1.0);
    assert_eq!(buf.get(4, 4), 1.0);
    assert_eq!(buf.get(3, 7), 0.0);
    assert_eq!(buf.get(7, 3), 0.0);
    assert_eq!(buf.covered_fraction(), 0.25);
}

#[test]
fn blinds_open_every_stripe_equally() {
    let mut rast = MaskRasterizer::new();
    let spec = MaskSpec::new(Shape::Blinds {
        count: 4,
        orientation: Orientation::Horizontal,
    });
    let buf = rast.rasterize(&spec, 0.5, 4, 16).unwrap();
    let rows: Vec<f32> = (0..16).map(|y| buf.get(0, y)).collect();
    assert_eq!(
        rows,
        vec![
            1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0
        ]
    );
}

#[test]
fn circle_is_isotropic_on_wide_canvas() {
    let mut rast = MaskRasterizer::new();
    let spec = MaskSpec::new(Shape::Circle);
    let (w, h) = (101u32, 41u32);
    let buf = rast.rasterize(&spec, 0.3, w, h).unwrap();
    let cy = 20;
    let cx = 50;
    let horiz = (0..w).filter(|&x| buf.get(x, cy) > 0.5).count() as i64;
    let vert = (0..h).filter(|&y| buf.get(cx, y) > 0.5).count() as i64;
    assert!((horiz - vert).abs() <= 2, "horiz={horiz} vert={vert}");
}

#[test]
fn feathering_softens_only_inside_the_shape() {
    let mut rast = MaskRasterizer::new();
    let hard = rast
        .rasterize(&MaskSpec::new(Shape::Circle), 0.5, 64, 64)
        .unwrap()
        .clone();
    let soft_spec = MaskSpec {
        feather_radius: 6.0,
        ..MaskSpec::new(Shape::Circle)
    };
    let soft = rast.rasterize(&soft_spec, 0.5, 64, 64).unwrap();
    let mut softened = 0;
    for (s, h) in soft.data.iter().zip(&hard.data) {
        assert!(*s <= *h);
        if *s > 0.0 && *s < 1.0 {
            softened += 1;
        }
    }
    assert!(softened > 0);
    assert_eq!(soft.get(32, 32), 1.0);
}

#[test]
fn progress_is_clamped() {
    let mut rast = MaskRasterizer::new();
    let spec = MaskSpec::new(Shape::Diamond);
    let over = rast.rasterize(&spec, 7.0, 16, 16).unwrap().clone();
    let one = rast.rasterize(&spec, 1.0, 16, 16).unwrap();
    assert_eq!(&over, one);
    let under = rast.rasterize(&spec, -1.0, 16, 16).unwrap();
    assert_eq!(under.covered_fraction(), 0.0);
}

#[test]
fn rejects_bad_specs() {
    let mut spec = MaskSpec::new(Shape::Circle);
    spec.center = (1.5, 0.5);
    assert!(spec.validate().is_err());

    let mut spec = MaskSpec::new(Shape::Circle);
    spec.feather_radius = -1.0;
    assert!(spec.validate().is_err());

    assert!(MaskRasterizer::new()
        .rasterize(&MaskSpec::new(Shape::Circle), 0.5, 0, 10)
        .is_err());
}

#[test]
fn parallel_result_is_independent_of_thread_count() {
    let spec = MaskSpec {
        feather_radius: 5.0,
        feather_curve: FeatherCurve::Smoothstep,
        ..MaskSpec::new(Shape::Star {
            inner_ratio: shape::DEFAULT_STAR_INNER_RATIO,
        })
    };
    let run = |threads: usize| {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();
        pool.install(|| {
            MaskRasterizer::new()
                .rasterize(&spec, 0.6, 57, 43)
                .unwrap()
                .clone()
        })
    };
    assert_eq!(run(1), run(4));
}

#[test]
fn feathering_every_shape_only_lowers_coverage() {
    let curves = [
        FeatherCurve::Linear,
        FeatherCurve::Conic,
        FeatherCurve::Smoothstep,
        FeatherCurve::Sigmoid,
    ];
    let mut hard_r = MaskRasterizer::new();
    let mut soft_r = MaskRasterizer::new();
    for shape in all_shapes() {
        for p in [0.3, 0.6] {
            let hard = hard_r
                .rasterize(&MaskSpec::new(shape), p, 40, 28)
                .unwrap()
                .clone();
            for radius in [0.0f32, 1.0, 50.0] {
                for curve in curves {
                    let spec = MaskSpec {
                        feather_radius: radius,
                        feather_curve: curve,
                        ..MaskSpec::new(shape)
                    };
                    let soft = soft_r.rasterize(&spec, p, 40, 28).unwrap();
                    for (s, h) in soft.data.iter().zip(&hard.data) {
                        assert!(
                            (0.0..=1.0).contains(s) && s <= h,
                            "{shape:?} p={p} r={radius} {curve:?}: {s} vs {h}"
                        );
                    }
                    if radius == 0.0 {
                        assert_eq!(soft.data, hard.data);
                    }
                }
            }
        }
    }
}
