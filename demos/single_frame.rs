//! Render one frame of a phasor scene to `frame.png`.

use phasorviz::{
    save_frame_png, Canvas, CpuRenderer, RenderBackend, RenderSettings, Rgba8, SceneBuilder,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let scene = SceneBuilder::new(8.0)
        .sine(1.5, 0.0, 4.0, Rgba8::RED)?
        .sine(2.5, std::f64::consts::FRAC_PI_2, 4.0, Rgba8::BLUE)?
        .labels(false)
        .build()?;

    let mut renderer = CpuRenderer::new(RenderSettings::default())?;
    let list = scene.display_list(0.35)?;
    let frame = renderer.render(&list, scene.world_bounds(), Canvas::new(960, 720)?)?;
    save_frame_png(&frame, "frame.png")?;
    Ok(())
}
