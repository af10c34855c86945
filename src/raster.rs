//! Software rasterizer implementing [`Surface`]
//!
//! Pixels are kept as premultiplied float RGBA so additive blending does not
//! lose precision across many overlapping particles; [`RasterSurface::image`]
//! converts back to a straight-alpha `RgbaImage`.

use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::surface::{BlendMode, Glow, Point, Surface};

/// An in-memory RGBA drawing surface.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    blend: BlendMode,
    /// Premultiplied RGBA, row-major
    buf: Vec<[f32; 4]>,
}

impl RasterSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            blend: BlendMode::SourceOver,
            buf: vec![[0.0; 4]; width as usize * height as usize],
        }
    }

    /// Reallocate to a new size; contents are cleared.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.buf = vec![[0.0; 4]; width as usize * height as usize];
    }

    /// Straight-alpha color of one pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(unpremultiply(self.buf[(y * self.width + x) as usize]))
    }

    /// Snapshot the surface as an image.
    pub fn image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width, self.height);
        for (px, src) in img.pixels_mut().zip(&self.buf) {
            *px = unpremultiply(*src);
        }
        img
    }

    /// Raw RGBA bytes, 4 per pixel, row-major.
    pub fn pixels(&self) -> Vec<u8> {
        self.image().into_raw()
    }

    /// Blend one pixel with the given coverage (0.0-1.0).
    fn plot(&mut self, x: i64, y: i64, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let sa = (color.a * coverage).clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }

        let blend = self.blend;
        let src = [color.r * sa, color.g * sa, color.b * sa, sa];
        let dst = &mut self.buf[(y as usize) * self.width as usize + x as usize];
        for (d, s) in dst.iter_mut().zip(src) {
            *d = blend.composite(s, *d, sa);
        }
    }

    /// Inclusive pixel range `(x0, y0, x1, y1)` covered by a box, clipped.
    fn bounds(&self, min: Point, max: Point) -> Option<(i64, i64, i64, i64)> {
        let x0 = min.x.floor().max(0.0) as i64;
        let y0 = min.y.floor().max(0.0) as i64;
        let x1 = (max.x.ceil() as i64).min(self.width as i64 - 1);
        let y1 = (max.y.ceil() as i64).min(self.height as i64 - 1);
        if x0 > x1 || y0 > y1 {
            None
        } else {
            Some((x0, y0, x1, y1))
        }
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.buf.fill([0.0; 4]);
    }

    fn blend(&self) -> BlendMode {
        self.blend
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color) {
        if !finite(from) || !finite(to) || width.is_nan() || width <= 0.0 {
            return;
        }

        let half = width / 2.0;
        let pad = half + 1.0;
        let min = Point::new(from.x.min(to.x) - pad, from.y.min(to.y) - pad);
        let max = Point::new(from.x.max(to.x) + pad, from.y.max(to.y) + pad);
        let Some((x0, y0, x1, y1)) = self.bounds(min, max) else {
            return;
        };

        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let d = segment_distance(p, from, to);
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.plot(x, y, color, coverage as f32);
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color, glow: Option<Glow>) {
        if !finite(center) || radius.is_nan() || radius <= 0.0 {
            return;
        }

        // The halo goes underneath the disc, like a canvas shadow.
        if let Some(glow) = glow.filter(|g| g.blur > 0.0) {
            let reach = radius + glow.blur;
            let sigma = glow.blur / 2.0;
            let halo = glow.color.with_alpha(glow.color.a * color.a);
            if let Some((x0, y0, x1, y1)) = self.bounds(
                Point::new(center.x - reach, center.y - reach),
                Point::new(center.x + reach, center.y + reach),
            ) {
                for y in y0..=y1 {
                    for x in x0..=x1 {
                        let d = distance(Point::new(x as f64 + 0.5, y as f64 + 0.5), center);
                        let outside = d - radius;
                        if outside <= 0.0 || outside > glow.blur {
                            continue;
                        }
                        let falloff = (-(outside * outside) / (2.0 * sigma * sigma)).exp();
                        self.plot(x, y, halo, falloff as f32);
                    }
                }
            }
        }

        let Some((x0, y0, x1, y1)) = self.bounds(
            Point::new(center.x - radius - 1.0, center.y - radius - 1.0),
            Point::new(center.x + radius + 1.0, center.y + radius + 1.0),
        ) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = distance(Point::new(x as f64 + 0.5, y as f64 + 0.5), center);
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.plot(x, y, color, coverage as f32);
                }
            }
        }
    }
}

fn finite(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let len_sq = abx * abx + aby * aby;
    if len_sq == 0.0 {
        return distance(p, a);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    distance(p, Point::new(a.x + abx * t, a.y + aby * t))
}

fn unpremultiply(px: [f32; 4]) -> Rgba<u8> {
    let a = px[3].clamp(0.0, 1.0);
    if a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let q = |v: f32| ((v / a).clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([q(px[0]), q(px[1]), q(px[2]), (a * 255.0).round() as u8])
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
    const BLUE: Color = Color { r: 0.0, g: 0.0, b: 1.0, a: 1.0 };

    #[test]
    fn test_new_surface_is_transparent() {
        let s = RasterSurface::new(4, 3);
        assert_eq!(s.image().dimensions(), (4, 3));
        assert!(s.image().pixels().all(|p| p[3] == 0));
        assert_eq!(s.pixels().len(), 4 * 3 * 4);
    }

    #[test]
    fn test_fill_circle_center_opaque() {
        let mut s = RasterSurface::new(16, 16);
        s.fill_circle(Point::new(8.0, 8.0), 3.0, RED, None);
        assert_eq!(s.pixel(8, 8), Some(Rgba([255, 0, 0, 255])));
        // well outside the disc
        assert_eq!(s.pixel(0, 0), Some(Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn test_glow_extends_beyond_disc() {
        let mut plain = RasterSurface::new(32, 32);
        plain.fill_circle(Point::new(16.0, 16.0), 2.0, RED, None);
        let mut glowing = RasterSurface::new(32, 32);
        glowing.fill_circle(
            Point::new(16.0, 16.0),
            2.0,
            RED,
            Some(Glow { blur: 8.0, color: RED }),
        );

        // 5px from center: outside the disc, inside the halo
        assert_eq!(plain.pixel(21, 16).unwrap()[3], 0);
        assert!(glowing.pixel(21, 16).unwrap()[3] > 0);
        // beyond radius + blur nothing is painted
        assert_eq!(glowing.pixel(31, 31).unwrap()[3], 0);
    }

    #[test]
    fn test_stroke_line_covers_segment() {
        let mut s = RasterSurface::new(20, 20);
        s.stroke_line(Point::new(2.0, 10.0), Point::new(18.0, 10.0), 2.0, BLUE);
        for x in 3..17 {
            assert_eq!(s.pixel(x, 9).unwrap()[2], 255, "x={}", x);
        }
        assert_eq!(s.pixel(10, 2).unwrap()[3], 0);
    }

    #[test]
    fn test_lighter_brightens_overlap() {
        let dim = Color::new(0.4, 0.0, 0.0, 1.0);

        let mut over = RasterSurface::new(8, 8);
        over.fill_circle(Point::new(4.0, 4.0), 3.0, dim, None);
        over.fill_circle(Point::new(4.0, 4.0), 3.0, dim, None);

        let mut lighter = RasterSurface::new(8, 8);
        lighter.set_blend(BlendMode::Lighter);
        lighter.fill_circle(Point::new(4.0, 4.0), 3.0, dim, None);
        lighter.fill_circle(Point::new(4.0, 4.0), 3.0, dim, None);

        assert_eq!(over.pixel(4, 4).unwrap()[0], 102);
        assert_eq!(lighter.pixel(4, 4).unwrap()[0], 204);
    }

    #[test]
    fn test_source_over_translucent() {
        let mut s = RasterSurface::new(4, 4);
        s.fill_circle(Point::new(2.0, 2.0), 2.0, BLUE, None);
        s.fill_circle(Point::new(2.0, 2.0), 2.0, RED.with_alpha(0.5), None);
        let px = s.pixel(2, 2).unwrap();
        assert_eq!(px[3], 255);
        assert!(px[0] > 100 && px[2] > 100);
    }

    #[test]
    fn test_offscreen_and_nan_draw_nothing() {
        let mut s = RasterSurface::new(8, 8);
        s.fill_circle(Point::new(-50.0, -50.0), 3.0, RED, Some(Glow { blur: 6.0, color: RED }));
        s.fill_circle(Point::new(f64::NAN, 4.0), 3.0, RED, None);
        s.stroke_line(Point::new(4.0, f64::NAN), Point::new(4.0, 4.0), 1.0, RED);
        s.stroke_line(Point::new(100.0, 100.0), Point::new(120.0, 130.0), 2.0, RED);
        assert!(s.image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_clear_and_resize() {
        let mut s = RasterSurface::new(8, 8);
        s.fill_circle(Point::new(4.0, 4.0), 3.0, RED, None);
        s.clear();
        assert!(s.image().pixels().all(|p| p[3] == 0));

        s.fill_circle(Point::new(4.0, 4.0), 3.0, RED, None);
        s.resize(3, 5);
        assert_eq!((s.width(), s.height()), (3, 5));
        assert!(s.image().pixels().all(|p| p[3] == 0));
        assert_eq!(s.pixel(3, 0), None);
    }

    #[test]
    fn test_segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_eq!(segment_distance(Point::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(segment_distance(Point::new(-4.0, 3.0), a, b), 5.0);
        assert_eq!(segment_distance(Point::new(1.0, 1.0), a, a), 2f64.sqrt());
    }
}
