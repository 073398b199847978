//! Three phasor-driven sine waves plus a linear reference function,
//! exported as `sine.mp4`.
//!
//! Pass a path to a TTF/OTF font to enable the textual annotations:
//!
//! ```sh
//! cargo run --example sine_waves -- /usr/share/fonts/truetype/dejavu/DejaVuSans.ttf
//! ```

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use phasorviz::{FunctionCurve, MovieWriter, Rgba8, SceneBuilder};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let period = 4.0;
    let builder = SceneBuilder::new(8.0)
        .sine(1.5, -FRAC_PI_4, period, Rgba8::RED)?
        .sine(2.5, 0.0, period, Rgba8::GREEN)?
        .sine(2.25, FRAC_PI_2, period, Rgba8::BLUE)?
        .curve(FunctionCurve::new("x / 4", |x| x / 4.0, Rgba8::CYAN));

    let font = std::env::args().nth(1);
    let scene = match &font {
        Some(_) => builder.build()?,
        None => builder.labels(false).build()?,
    };

    let mut writer = MovieWriter::new(300, 5)?;
    writer.settings.font_source = font.map(Into::into);
    writer.write_movie("sine.mp4", &scene)?;
    Ok(())
}
