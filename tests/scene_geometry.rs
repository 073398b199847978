//! End-to-end geometry checks on the display lists a scene produces.

use std::f64::consts::FRAC_PI_4;

use phasorviz::{DrawOp, LineStyle, Rgba8, SceneBuilder, Waveform};

#[test]
fn trail_reaches_the_analytic_sample_at_mid_animation() {
    // axis = 8, t = 0.5 puts the moving sample at x = 4.
    let scene = SceneBuilder::new(8.0)
        .sine(1.5, -FRAC_PI_4, 4.0, Rgba8::RED)
        .unwrap()
        .labels(false)
        .build()
        .unwrap();
    let list = scene.display_list(0.5).unwrap();

    let trail = list
        .ops()
        .iter()
        .find_map(|op| match op {
            DrawOp::Polyline { points, color, stroke }
                if *color == Rgba8::RED
                    && stroke.line == LineStyle::Solid
                    && points.len() > 2 =>
            {
                Some(points)
            }
            _ => None,
        })
        .expect("scene should emit a red trail");

    let last = trail.last().unwrap();
    let expected = 1.5 * (std::f64::consts::TAU - FRAC_PI_4).sin();
    assert!((last.x - 4.0).abs() < 1e-12);
    assert!((last.y - expected).abs() < 1e-9);
    assert!((expected - (-1.0607)).abs() < 1e-3);
}

#[test]
fn trail_matches_waveform_at_every_sample() {
    let scene = SceneBuilder::new(8.0)
        .sine(2.0, 0.3, 4.0, Rgba8::BLUE)
        .unwrap()
        .labels(false)
        .build()
        .unwrap();
    let wave = Waveform::new(2.0, 0.3, 4.0).unwrap();
    let list = scene.display_list(0.25).unwrap();

    let trail = list
        .ops()
        .iter()
        .find_map(|op| match op {
            DrawOp::Polyline { points, color, .. }
                if *color == Rgba8::BLUE && points.len() > 2 =>
            {
                Some(points)
            }
            _ => None,
        })
        .unwrap();

    for p in trail {
        assert!((p.y - wave.value_at(p.x)).abs() < 1e-12);
    }
}

#[test]
fn construction_path_closes_back_onto_the_trail() {
    let scene = SceneBuilder::new(8.0)
        .sine(1.5, 0.0, 4.0, Rgba8::RED)
        .unwrap()
        .labels(false)
        .build()
        .unwrap();
    let list = scene.display_list(0.5).unwrap();

    let dotted = list
        .ops()
        .iter()
        .find_map(|op| match op {
            DrawOp::Polyline { points, stroke, .. } if stroke.line == LineStyle::Dotted => {
                Some(points)
            }
            _ => None,
        })
        .expect("sine curves emit a dotted construction path");

    // Starts at the circle origin on the axis, ends on the axis below the
    // moving sample, and the horizontal run is at the wave's height.
    assert_eq!(dotted.len(), 4);
    assert_eq!(dotted[0].x, scene.circle_origin());
    assert_eq!(dotted[0].y, 0.0);
    assert_eq!(dotted[3].x, 4.0);
    assert_eq!(dotted[3].y, 0.0);
    assert!((dotted[1].y - dotted[2].y).abs() < 1e-12);
}

#[test]
fn dashed_circle_radius_tracks_each_amplitude() {
    let scene = SceneBuilder::new(8.0)
        .sine(1.5, 0.0, 4.0, Rgba8::RED)
        .unwrap()
        .sine(2.5, 0.0, 4.0, Rgba8::GREEN)
        .unwrap()
        .labels(false)
        .build()
        .unwrap();
    let list = scene.display_list(0.1).unwrap();

    let circles: Vec<(f64, Rgba8)> = list
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Circle { radius, color, center, stroke } => {
                assert_eq!(stroke.line, LineStyle::Dashed);
                assert_eq!(center.x, scene.circle_origin());
                assert_eq!(center.y, 0.0);
                Some((*radius, *color))
            }
            _ => None,
        })
        .collect();

    assert_eq!(circles, vec![(1.5, Rgba8::RED), (2.5, Rgba8::GREEN)]);
}
