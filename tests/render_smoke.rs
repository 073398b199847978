//! Rasterization smoke tests: deterministic output, correct buffer shape,
//! and the font precondition for labeled scenes.

use phasorviz::{Canvas, CpuRenderer, RenderBackend, RenderSettings, Rgba8, SceneBuilder};

fn mix64(mut x: u64) -> u64 {
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51_afd7_ed55_8ccd);
    x ^= x >> 33;
    x = x.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    x ^ (x >> 33)
}

fn digest_u64(data: &[u8]) -> u64 {
    let mut acc = 0xcbf2_9ce4_8422_2325u64;
    for chunk in data.chunks(8) {
        let mut word = [0u8; 8];
        word[..chunk.len()].copy_from_slice(chunk);
        acc = mix64(acc ^ u64::from_le_bytes(word));
    }
    acc
}

fn demo_scene() -> phasorviz::Scene {
    SceneBuilder::new(8.0)
        .sine(1.5, -std::f64::consts::FRAC_PI_4, 4.0, Rgba8::RED)
        .unwrap()
        .sine(2.5, 0.0, 4.0, Rgba8::GREEN)
        .unwrap()
        .labels(false)
        .build()
        .unwrap()
}

#[test]
fn render_is_deterministic_across_runs() {
    let scene = demo_scene();
    let canvas = Canvas::new(64, 64).unwrap();
    let settings = RenderSettings {
        margin_px: 4.0,
        ..RenderSettings::default()
    };

    let mut digests = Vec::new();
    for _ in 0..2 {
        let mut renderer = CpuRenderer::new(settings.clone()).unwrap();
        let list = scene.display_list(0.35).unwrap();
        let frame = renderer.render(&list, scene.world_bounds(), canvas).unwrap();

        assert_eq!(frame.width, 64);
        assert_eq!(frame.height, 64);
        assert_eq!(frame.data.len(), 64 * 64 * 4);
        assert!(frame.premultiplied);
        digests.push(digest_u64(&frame.data));
    }
    assert_eq!(digests[0], digests[1]);
}

#[test]
fn frames_at_different_times_differ() {
    let scene = demo_scene();
    let canvas = Canvas::new(64, 64).unwrap();
    let mut renderer = CpuRenderer::new(RenderSettings {
        margin_px: 4.0,
        ..RenderSettings::default()
    })
    .unwrap();

    let early = renderer
        .render(
            &scene.display_list(0.05).unwrap(),
            scene.world_bounds(),
            canvas,
        )
        .unwrap();
    let late = renderer
        .render(
            &scene.display_list(0.85).unwrap(),
            scene.world_bounds(),
            canvas,
        )
        .unwrap();
    assert_ne!(digest_u64(&early.data), digest_u64(&late.data));
}

#[test]
fn rendered_frame_contains_curve_colors() {
    let scene = demo_scene();
    let canvas = Canvas::new(128, 128).unwrap();
    let mut renderer = CpuRenderer::new(RenderSettings {
        margin_px: 4.0,
        ..RenderSettings::default()
    })
    .unwrap();

    let frame = renderer
        .render(
            &scene.display_list(0.5).unwrap(),
            scene.world_bounds(),
            canvas,
        )
        .unwrap();

    // White background plus at least some non-background ink.
    let mut white = 0usize;
    let mut ink = 0usize;
    for px in frame.data.chunks_exact(4) {
        if px[0] > 240 && px[1] > 240 && px[2] > 240 {
            white += 1;
        } else if px[3] > 0 {
            ink += 1;
        }
    }
    assert!(white > 0);
    assert!(ink > 0);
}

#[test]
fn labeled_scene_without_font_fails_with_font_error() {
    let scene = SceneBuilder::new(8.0)
        .sine(1.0, 0.0, 4.0, Rgba8::RED)
        .unwrap()
        .build()
        .unwrap();
    let canvas = Canvas::new(64, 64).unwrap();
    let mut renderer = CpuRenderer::new(RenderSettings::default()).unwrap();

    let err = renderer
        .render(
            &scene.display_list(0.0).unwrap(),
            scene.world_bounds(),
            canvas,
        )
        .unwrap_err();
    assert!(err.to_string().contains("font_source"));
}
