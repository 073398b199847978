use std::path::PathBuf;

use crate::{
    core::{Canvas, Rect},
    display::DisplayList,
    error::PhasorvizResult,
};

/// One rendered frame: row-major RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// Rasterizer configuration.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RenderSettings {
    /// Background color (straight RGBA8) the frame is cleared to, or `None`
    /// for transparent.
    pub clear_rgba: Option<[u8; 4]>,
    /// Font file used for annotations and tick labels. Scenes that draw
    /// text fail to render when this is unset.
    pub font_source: Option<PathBuf>,
    /// Pixel margin kept free on every canvas edge.
    pub margin_px: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_rgba: Some([255, 255, 255, 255]),
            font_source: None,
            margin_px: 24.0,
        }
    }
}

/// Black-box drawing sink: maps a world-coordinate display list onto a
/// pixel frame.
pub trait RenderBackend {
    fn render(
        &mut self,
        list: &DisplayList,
        world: Rect,
        canvas: Canvas,
    ) -> PhasorvizResult<FrameRGBA>;
}
