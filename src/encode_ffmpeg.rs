use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::{
    error::{PhasorvizError, PhasorvizResult},
    render::FrameRGBA,
};

/// MP4 encoding parameters handed to the `ffmpeg` system binary.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub out_path: PathBuf,
    /// Replace an existing output file instead of failing.
    pub overwrite: bool,
}

impl EncodeConfig {
    pub fn validate(&self) -> PhasorvizResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PhasorvizError::validation(format!(
                "encode dimensions must be nonzero (got {}x{})",
                self.width, self.height
            )));
        }
        // yuv420p subsamples chroma 2x2.
        if self.width % 2 != 0 || self.height % 2 != 0 {
            return Err(PhasorvizError::validation(format!(
                "encode dimensions must be even for yuv420p (got {}x{})",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(PhasorvizError::validation("encode fps must be nonzero"));
        }
        Ok(())
    }

    pub fn with_out_path(mut self, out_path: impl Into<PathBuf>) -> Self {
        self.out_path = out_path.into();
        self
    }
}

/// Baseline H.264 configuration playable by stock players.
pub fn default_mp4_config(width: u32, height: u32, fps: u32) -> EncodeConfig {
    EncodeConfig {
        width,
        height,
        fps,
        out_path: PathBuf::from("out.mp4"),
        overwrite: true,
    }
}

/// Whether an `ffmpeg` binary is reachable on PATH.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn ensure_parent_dir(path: &Path) -> PhasorvizResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PhasorvizError::encode(format!(
                    "failed to create output directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }
    }
    Ok(())
}

/// Streams raw RGBA frames into an `ffmpeg` child process that muxes an
/// H.264 MP4. Frames with alpha are flattened over a background color
/// because yuv420p has no alpha channel.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    bg_rgba: [u8; 4],
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    scratch: Vec<u8>,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig, bg_rgba: [u8; 4]) -> PhasorvizResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;
        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(PhasorvizError::encode(format!(
                "output '{}' exists and overwrite is disabled",
                cfg.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(PhasorvizError::encode(
                "ffmpeg not found on PATH; install ffmpeg to export movies",
            ));
        }

        let mut child = Command::new("ffmpeg")
            .arg(if cfg.overwrite { "-y" } else { "-n" })
            .args(["-loglevel", "error"])
            .args(["-f", "rawvideo"])
            .args(["-pix_fmt", "rgba"])
            .args(["-s", &format!("{}x{}", cfg.width, cfg.height)])
            .args(["-r", &cfg.fps.to_string()])
            .args(["-i", "pipe:0"])
            .arg("-an")
            .args(["-c:v", "libx264"])
            .args(["-pix_fmt", "yuv420p"])
            .args(["-movflags", "+faststart"])
            .arg(&cfg.out_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PhasorvizError::encode(format!("failed to spawn ffmpeg: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| PhasorvizError::encode("ffmpeg stdin was not captured"))?;

        let scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        Ok(Self {
            cfg,
            bg_rgba,
            child: Some(child),
            stdin: Some(stdin),
            scratch,
        })
    }

    pub fn config(&self) -> &EncodeConfig {
        &self.cfg
    }

    pub fn write_frame(&mut self, frame: &FrameRGBA) -> PhasorvizResult<()> {
        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(PhasorvizError::encode(format!(
                "frame is {}x{} but encoder expects {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        let expected = self.scratch.len();
        if frame.data.len() != expected {
            return Err(PhasorvizError::encode(format!(
                "frame has {} bytes, expected {expected}",
                frame.data.len()
            )));
        }
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| PhasorvizError::encode("encoder is already finished"))?;

        flatten_over(&frame.data, frame.premultiplied, self.bg_rgba, &mut self.scratch);
        stdin
            .write_all(&self.scratch)
            .map_err(|e| PhasorvizError::encode(format!("failed to write frame to ffmpeg: {e}")))
    }

    /// Close the stream and wait for ffmpeg to finalize the container.
    /// Idempotent; later calls after a successful finish are no-ops.
    pub fn finish(&mut self) -> PhasorvizResult<()> {
        drop(self.stdin.take());
        let Some(child) = self.child.take() else {
            return Ok(());
        };
        let output = child
            .wait_with_output()
            .map_err(|e| PhasorvizError::encode(format!("failed to wait for ffmpeg: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PhasorvizError::encode(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        tracing::debug!(out = %self.cfg.out_path.display(), "ffmpeg finished");
        Ok(())
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            drop(self.stdin.take());
            let _ = child.wait();
        }
    }
}

#[inline]
fn mul_div255(x: u16, y: u16) -> u8 {
    ((x * y + 127) / 255) as u8
}

/// Composite RGBA pixels over an opaque background into `out`, which must
/// be the same length as `src`.
fn flatten_over(src: &[u8], premultiplied: bool, bg: [u8; 4], out: &mut [u8]) {
    debug_assert_eq!(src.len(), out.len());
    for (s, d) in src.chunks_exact(4).zip(out.chunks_exact_mut(4)) {
        let a = s[3] as u16;
        let inv = 255 - a;
        for i in 0..3 {
            let fg = if premultiplied {
                s[i] as u16
            } else {
                mul_div255(s[i] as u16, a) as u16
            };
            d[i] = fg as u8 + mul_div255(bg[i] as u16, inv);
        }
        d[3] = 255;
    }
}
