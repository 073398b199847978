//! Animated sine-wave plots with their generating phasor circles,
//! rendered on the CPU and exported as H.264 MP4 movies.
//!
//! The pipeline is: [`Waveform`] models → [`Scene`] composition →
//! [`DisplayList`] per frame → [`CpuRenderer`] rasterization →
//! [`MovieWriter`] streaming into ffmpeg.
//!
//! ```no_run
//! use phasorviz::{MovieWriter, Rgba8, SceneBuilder};
//!
//! # fn main() -> phasorviz::PhasorvizResult<()> {
//! let scene = SceneBuilder::new(8.0)
//!     .sine(1.5, -std::f64::consts::FRAC_PI_4, 4.0, Rgba8::RED)?
//!     .labels(false)
//!     .build()?;
//! MovieWriter::new(200, 15)?.write_movie("sine.mp4", &scene)?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod core;
pub mod curve;
pub mod display;
pub mod encode_ffmpeg;
pub mod error;
pub mod export;
pub mod render;
pub mod render_cpu;
pub mod scene;
pub mod waveform;

pub use self::core::{Canvas, Point, Rect, Rgba8, Vec2, Viewport};
pub use self::curve::{Curve, FunctionCurve, SineCurve};
pub use self::display::{DisplayList, DrawOp, LineStyle, StrokeStyle};
pub use self::encode_ffmpeg::{
    default_mp4_config, is_ffmpeg_on_path, EncodeConfig, FfmpegEncoder,
};
pub use self::error::{PhasorvizError, PhasorvizResult};
pub use self::export::{frame_position, save_frame_png, FrameSink, MovieWriter};
pub use self::render::{FrameRGBA, RenderBackend, RenderSettings};
pub use self::render_cpu::CpuRenderer;
pub use self::scene::{Scene, SceneBuilder};
pub use self::waveform::Waveform;
