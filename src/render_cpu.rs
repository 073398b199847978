use anyhow::Context as _;
use kurbo::Shape as _;

use crate::{
    core::{BezPath, Canvas, Point, Rect, Rgba8, Viewport},
    display::{DisplayList, DrawOp, LineStyle, StrokeStyle},
    error::{PhasorvizError, PhasorvizResult},
    render::{FrameRGBA, RenderBackend, RenderSettings},
};

// Dash patterns in output pixels.
const DASH_PATTERN: [f64; 2] = [6.0, 4.0];
const DOT_PATTERN: [f64; 2] = [1.0, 2.5];

/// RGBA8 brush color carried through Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TextBrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

/// Stateful helper for building Parley text layouts from raw font bytes.
struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl TextLayoutEngine {
    fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    fn layout_plain(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> PhasorvizResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PhasorvizError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            PhasorvizError::validation("no font families registered from font bytes")
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PhasorvizError::validation("registered font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// CPU rasterizer for [`DisplayList`]s, built on `vello_cpu`.
///
/// Strokes are expanded to fill outlines with `kurbo` (which also applies
/// the dash patterns), so the sparse-strip pipeline only ever fills paths.
pub struct CpuRenderer {
    settings: RenderSettings,
    font_bytes: Option<Vec<u8>>,
    font: Option<vello_cpu::peniko::FontData>,
    text: TextLayoutEngine,
}

impl CpuRenderer {
    /// Build a renderer, loading the annotation font up front if one is
    /// configured so a bad path fails before any frame is rendered.
    pub fn new(settings: RenderSettings) -> PhasorvizResult<Self> {
        let font_bytes = match &settings.font_source {
            Some(path) => Some(
                std::fs::read(path)
                    .with_context(|| format!("failed to read font '{}'", path.display()))?,
            ),
            None => None,
        };
        let font = font_bytes.as_ref().map(|bytes| {
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.clone()), 0)
        });

        Ok(Self {
            settings,
            font_bytes,
            font,
            text: TextLayoutEngine::new(),
        })
    }
}

impl RenderBackend for CpuRenderer {
    fn render(
        &mut self,
        list: &DisplayList,
        world: Rect,
        canvas: Canvas,
    ) -> PhasorvizResult<FrameRGBA> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| PhasorvizError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| PhasorvizError::render("canvas height exceeds u16"))?;

        let viewport = Viewport::fit(world, canvas, self.settings.margin_px)?;

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        let clear = self
            .settings
            .clear_rgba
            .map(|[r, g, b, a]| premul_rgba8(r, g, b, a))
            .unwrap_or([0, 0, 0, 0]);
        clear_pixmap(&mut pixmap, clear);

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        for op in list.ops() {
            match op {
                DrawOp::Polyline {
                    points,
                    color,
                    stroke,
                } => self.draw_polyline(&mut ctx, &viewport, points, *color, *stroke),
                DrawOp::Circle {
                    center,
                    radius,
                    color,
                    stroke,
                } => self.draw_circle(&mut ctx, &viewport, *center, *radius, *color, *stroke),
                DrawOp::Text {
                    anchor,
                    content,
                    color,
                    size_px,
                } => self.draw_text(&mut ctx, viewport.to_pixels(*anchor), content, *color, *size_px)?,
            }
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

impl CpuRenderer {
    fn draw_polyline(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        viewport: &Viewport,
        points: &[Point],
        color: Rgba8,
        stroke: StrokeStyle,
    ) {
        let Some(first) = points.first() else {
            return;
        };

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(color));

        if points.len() == 1 {
            // Degenerate trail: a dot at the single sample.
            let p = viewport.to_pixels(*first);
            let dot = kurbo::Circle::new(p, stroke.width_px.max(1.0) / 2.0).to_path(0.1);
            ctx.fill_path(&bezpath_to_cpu(&dot));
            return;
        }

        let mut path = BezPath::new();
        path.move_to(viewport.to_pixels(*first));
        for p in &points[1..] {
            path.line_to(viewport.to_pixels(*p));
        }
        ctx.fill_path(&bezpath_to_cpu(&expand_stroke(&path, stroke)));
    }

    fn draw_circle(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        viewport: &Viewport,
        center: Point,
        radius: f64,
        color: Rgba8,
        stroke: StrokeStyle,
    ) {
        if radius <= 0.0 {
            return;
        }
        let outline = kurbo::Circle::new(viewport.to_pixels(center), radius * viewport.scale())
            .to_path(0.1);

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(color));
        ctx.fill_path(&bezpath_to_cpu(&expand_stroke(&outline, stroke)));
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        anchor_px: Point,
        content: &str,
        color: Rgba8,
        size_px: f32,
    ) -> PhasorvizResult<()> {
        let (Some(font_bytes), Some(font)) = (&self.font_bytes, &self.font) else {
            return Err(PhasorvizError::validation(
                "scene draws text but RenderSettings.font_source is unset; \
                 configure a font or build the scene with labels(false)",
            ));
        };

        let brush = TextBrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        };
        let layout = self
            .text
            .layout_plain(content, font_bytes, size_px, brush)?;

        // Left-aligned at the anchor, vertically centered on it.
        let top = anchor_px.y - f64::from(layout.height()) / 2.0;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((anchor_px.x, top)));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        Ok(())
    }
}

/// Expand a stroked path (with any dash pattern) to a fillable outline.
fn expand_stroke(path: &BezPath, style: StrokeStyle) -> BezPath {
    let mut stroke = kurbo::Stroke::new(style.width_px)
        .with_caps(kurbo::Cap::Round)
        .with_join(kurbo::Join::Round);
    match style.line {
        LineStyle::Solid => {}
        LineStyle::Dashed => stroke = stroke.with_dashes(0.0, DASH_PATTERN),
        LineStyle::Dotted => stroke = stroke.with_dashes(0.0, DOT_PATTERN),
    }
    kurbo::stroke(path.iter(), &stroke, &kurbo::StrokeOpts::default(), 0.25)
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn premul_rgba8(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    let af = (a as u16) + 1;
    let premul = |c: u8| -> u8 { (((c as u16) * af) >> 8) as u8 };
    [premul(r), premul(g), premul(b), a]
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
