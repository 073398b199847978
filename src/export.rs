use std::path::Path;

use crate::{
    core::Canvas,
    encode_ffmpeg::{default_mp4_config, FfmpegEncoder},
    error::{PhasorvizError, PhasorvizResult},
    render::{FrameRGBA, RenderBackend, RenderSettings},
    render_cpu::CpuRenderer,
    scene::Scene,
};

/// Destination for rendered frames, in order.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &FrameRGBA) -> PhasorvizResult<()>;
    fn finish(&mut self) -> PhasorvizResult<()>;
}

impl FrameSink for FfmpegEncoder {
    fn write_frame(&mut self, frame: &FrameRGBA) -> PhasorvizResult<()> {
        FfmpegEncoder::write_frame(self, frame)
    }

    fn finish(&mut self) -> PhasorvizResult<()> {
        FfmpegEncoder::finish(self)
    }
}

/// Normalized time of frame `index` out of `frames`, in `[0, 1)`.
pub fn frame_position(index: u32, frames: u32) -> f64 {
    f64::from(index) / f64::from(frames)
}

/// Renders a scene frame by frame and streams the result into an MP4.
#[derive(Debug)]
pub struct MovieWriter {
    pub frames: u32,
    pub fps: u32,
    pub canvas: Canvas,
    pub settings: RenderSettings,
}

impl Default for MovieWriter {
    fn default() -> Self {
        Self {
            frames: 200,
            fps: 15,
            canvas: Canvas {
                width: 960,
                height: 720,
            },
            settings: RenderSettings::default(),
        }
    }
}

impl MovieWriter {
    pub fn new(frames: u32, fps: u32) -> PhasorvizResult<Self> {
        let writer = Self {
            frames,
            fps,
            ..Self::default()
        };
        writer.validate()?;
        Ok(writer)
    }

    pub fn validate(&self) -> PhasorvizResult<()> {
        if self.frames == 0 {
            return Err(PhasorvizError::validation("frame count must be nonzero"));
        }
        if self.fps == 0 {
            return Err(PhasorvizError::validation("fps must be nonzero"));
        }
        Ok(())
    }

    /// Render all frames of `scene` and encode them to `out_path`.
    ///
    /// The container is finalized even when a frame fails mid-run; the
    /// first error wins.
    #[tracing::instrument(skip(self, scene), fields(frames = self.frames, fps = self.fps))]
    pub fn write_movie(&self, out_path: impl AsRef<Path> + std::fmt::Debug, scene: &Scene) -> PhasorvizResult<()> {
        self.validate()?;
        let mut renderer = CpuRenderer::new(self.settings.clone())?;

        let bg = self.settings.clear_rgba.unwrap_or([255, 255, 255, 255]);
        let cfg = default_mp4_config(self.canvas.width, self.canvas.height, self.fps)
            .with_out_path(out_path.as_ref());
        let mut sink = FfmpegEncoder::new(cfg, bg)?;

        let result = self.write_frames(scene, &mut renderer, &mut sink);
        match result {
            Ok(()) => {
                sink.finish()?;
                tracing::info!(out = %out_path.as_ref().display(), "movie written");
                Ok(())
            }
            Err(e) => {
                let _ = sink.finish();
                Err(e)
            }
        }
    }

    /// Drive one render pass: exactly `frames` frames at strictly
    /// increasing normalized times in `[0, 1)`.
    pub fn write_frames(
        &self,
        scene: &Scene,
        renderer: &mut dyn RenderBackend,
        sink: &mut dyn FrameSink,
    ) -> PhasorvizResult<()> {
        self.validate()?;
        for index in 0..self.frames {
            let t = frame_position(index, self.frames);
            let list = scene.display_list(t)?;
            let frame = renderer.render(&list, scene.world_bounds(), self.canvas)?;
            sink.write_frame(&frame)?;
        }
        Ok(())
    }
}

/// Write a single frame as a PNG, for stills and debugging.
pub fn save_frame_png(frame: &FrameRGBA, path: impl AsRef<Path>) -> PhasorvizResult<()> {
    let mut data = frame.data.clone();
    if frame.premultiplied {
        for px in data.chunks_exact_mut(4) {
            let a = px[3] as u16;
            if a > 0 && a < 255 {
                for c in px.iter_mut().take(3) {
                    *c = ((*c as u16 * 255) / a).min(255) as u8;
                }
            }
        }
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, data)
        .ok_or_else(|| PhasorvizError::encode("frame buffer does not match its dimensions"))?;
    img.save(path.as_ref()).map_err(|e| {
        PhasorvizError::encode(format!(
            "failed to write PNG '{}': {e}",
            path.as_ref().display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{Canvas, Rect, Rgba8},
        display::DisplayList,
        scene::SceneBuilder,
    };

    struct StubRenderer;

    impl RenderBackend for StubRenderer {
        fn render(
            &mut self,
            _list: &DisplayList,
            _world: Rect,
            canvas: Canvas,
        ) -> PhasorvizResult<FrameRGBA> {
            Ok(FrameRGBA {
                width: canvas.width,
                height: canvas.height,
                data: vec![0; (canvas.width * canvas.height * 4) as usize],
                premultiplied: false,
            })
        }
    }

    #[derive(Default)]
    struct CountingSink {
        frames: u32,
        finished: bool,
    }

    impl FrameSink for CountingSink {
        fn write_frame(&mut self, _frame: &FrameRGBA) -> PhasorvizResult<()> {
            self.frames += 1;
            Ok(())
        }

        fn finish(&mut self) -> PhasorvizResult<()> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn writer_rejects_zero_frames_or_fps() {
        assert!(MovieWriter::new(0, 15).is_err());
        assert!(MovieWriter::new(200, 0).is_err());
        assert!(MovieWriter::new(1, 1).is_ok());
    }

    #[test]
    fn defaults_match_two_hundred_frames_at_fifteen_fps() {
        let w = MovieWriter::default();
        assert_eq!(w.frames, 200);
        assert_eq!(w.fps, 15);
        assert_eq!((w.canvas.width, w.canvas.height), (960, 720));
    }

    #[test]
    fn frame_positions_are_strictly_increasing_in_unit_range() {
        let frames = 10;
        let mut prev = -1.0;
        for i in 0..frames {
            let t = frame_position(i, frames);
            assert!(t > prev);
            assert!((0.0..1.0).contains(&t));
            prev = t;
        }
        assert_eq!(frame_position(0, frames), 0.0);
    }

    #[test]
    fn export_writes_exactly_one_frame_per_index() {
        let scene = SceneBuilder::new(8.0)
            .sine(1.5, 0.0, 4.0, Rgba8::RED)
            .unwrap()
            .labels(false)
            .build()
            .unwrap();

        let writer = MovieWriter {
            frames: 10,
            fps: 5,
            canvas: Canvas::new(4, 4).unwrap(),
            settings: RenderSettings::default(),
        };

        let mut renderer = StubRenderer;
        let mut sink = CountingSink::default();
        writer
            .write_frames(&scene, &mut renderer, &mut sink)
            .unwrap();
        assert_eq!(sink.frames, 10);
        assert!(!sink.finished);
    }
}
