use crate::error::{PhasorvizError, PhasorvizResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Output raster size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> PhasorvizResult<Self> {
        if width == 0 || height == 0 {
            return Err(PhasorvizError::validation(
                "canvas width/height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);
    pub const RED: Self = Self::from_rgb(214, 39, 40);
    pub const GREEN: Self = Self::from_rgb(44, 160, 44);
    pub const BLUE: Self = Self::from_rgb(31, 119, 180);
    pub const CYAN: Self = Self::from_rgb(23, 190, 207);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// World → pixel mapping with uniform scale (equal aspect) and a flipped
/// y axis, centered inside a pixel margin.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    scale: f64,
    affine: Affine,
}

impl Viewport {
    /// Fit `world` into `canvas`, leaving `margin_px` on every side.
    pub fn fit(world: Rect, canvas: Canvas, margin_px: f64) -> PhasorvizResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(PhasorvizError::validation(
                "viewport canvas must be non-zero",
            ));
        }
        let (ww, wh) = (world.width(), world.height());
        if !(ww.is_finite() && wh.is_finite()) || ww <= 0.0 || wh <= 0.0 {
            return Err(PhasorvizError::validation(
                "viewport world rect must be finite with positive extent",
            ));
        }
        if !margin_px.is_finite() || margin_px < 0.0 {
            return Err(PhasorvizError::validation(
                "viewport margin must be finite and >= 0",
            ));
        }

        let avail_w = f64::from(canvas.width) - 2.0 * margin_px;
        let avail_h = f64::from(canvas.height) - 2.0 * margin_px;
        if avail_w <= 0.0 || avail_h <= 0.0 {
            return Err(PhasorvizError::validation(
                "viewport margin leaves no drawable area",
            ));
        }

        let scale = (avail_w / ww).min(avail_h / wh);
        let origin_x = margin_px + (avail_w - ww * scale) / 2.0;
        let origin_y = margin_px + (avail_h - wh * scale) / 2.0;

        // px = origin_x + (x - world.x0) * s
        // py = origin_y + (world.y1 - y) * s   (world y grows upward)
        let affine = Affine::new([
            scale,
            0.0,
            0.0,
            -scale,
            origin_x - world.x0 * scale,
            origin_y + world.y1 * scale,
        ]);

        Ok(Self { scale, affine })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn affine(&self) -> Affine {
        self.affine
    }

    pub fn to_pixels(&self, p: Point) -> Point {
        self.affine * p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_rejects_zero_dimension() {
        assert!(Canvas::new(0, 10).is_err());
        assert!(Canvas::new(10, 0).is_err());
        assert!(Canvas::new(10, 10).is_ok());
    }

    #[test]
    fn viewport_maps_corners_inside_canvas() {
        let world = Rect::new(-2.0, -1.0, 8.0, 3.0);
        let canvas = Canvas::new(640, 480).unwrap();
        let vp = Viewport::fit(world, canvas, 20.0).unwrap();

        for p in [
            Point::new(world.x0, world.y0),
            Point::new(world.x1, world.y1),
            Point::new(world.x0, world.y1),
            Point::new(world.x1, world.y0),
        ] {
            let px = vp.to_pixels(p);
            assert!(px.x >= 19.9 && px.x <= 620.1, "x out of range: {px:?}");
            assert!(px.y >= 19.9 && px.y <= 460.1, "y out of range: {px:?}");
        }
    }

    #[test]
    fn viewport_flips_y() {
        let world = Rect::new(0.0, -1.0, 1.0, 1.0);
        let canvas = Canvas::new(100, 100).unwrap();
        let vp = Viewport::fit(world, canvas, 0.0).unwrap();

        let top = vp.to_pixels(Point::new(0.5, 1.0));
        let bottom = vp.to_pixels(Point::new(0.5, -1.0));
        assert!(top.y < bottom.y);
    }

    #[test]
    fn viewport_preserves_aspect() {
        // A wide world on a square canvas must use the x-limited scale.
        let world = Rect::new(0.0, 0.0, 10.0, 1.0);
        let canvas = Canvas::new(100, 100).unwrap();
        let vp = Viewport::fit(world, canvas, 0.0).unwrap();
        assert!((vp.scale() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn viewport_rejects_degenerate_world() {
        let canvas = Canvas::new(100, 100).unwrap();
        assert!(Viewport::fit(Rect::new(0.0, 0.0, 0.0, 1.0), canvas, 0.0).is_err());
        assert!(Viewport::fit(Rect::new(0.0, 0.0, 1.0, f64::NAN), canvas, 0.0).is_err());
        assert!(Viewport::fit(Rect::new(0.0, 0.0, 1.0, 1.0), canvas, 60.0).is_err());
    }
}
