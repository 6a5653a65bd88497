//! A CPU raster surface.
//!
//! Pixels are straight-alpha RGBA `f32` and every primitive is composited
//! source-over. Contents persist between frames like an HTML canvas, so the
//! engine's faint wash leaves fading trails behind moving particles. Used for
//! headless rendering and PNG export.

use std::path::Path;

use glam::{Vec2, Vec3, Vec4};
use image::{ImageResult, Rgba, RgbaImage};

use crate::surface::RenderSurface;
use crate::visuals::{sample_gradient, GradientStop};

/// An in-memory RGBA image that implements [`RenderSurface`].
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    background: Vec3,
    pixels: Vec<Vec4>,
}

impl Canvas {
    /// Opaque canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Vec3) -> Self {
        Self {
            width,
            height,
            background,
            pixels: vec![background.extend(1.0); width as usize * height as usize],
        }
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resize and clear to the background, as resizing a canvas element does.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.clear();
    }

    /// Fill with the background color.
    pub fn clear(&mut self) {
        let fill = self.background.extend(1.0);
        self.pixels.clear();
        self.pixels.resize(self.width as usize * self.height as usize, fill);
    }

    /// Pixel at `(x, y)`, or `None` out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec4> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Composite `color` at `alpha` over pixel `(x, y)`.
    #[inline]
    fn blend(&mut self, x: u32, y: u32, color: Vec3, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let dst = &mut self.pixels[(y * self.width + x) as usize];
        let dst_a = dst.w;
        let out_a = alpha + dst_a * (1.0 - alpha);
        let rgb = if out_a > 0.0 {
            (color * alpha + dst.truncate() * dst_a * (1.0 - alpha)) / out_a
        } else {
            Vec3::ZERO
        };
        *dst = rgb.clamp(Vec3::ZERO, Vec3::ONE).extend(out_a.clamp(0.0, 1.0));
    }

    /// Pixel bounding box of a region, clipped to the canvas.
    fn clip(&self, min: Vec2, max: Vec2) -> Option<(u32, u32, u32, u32)> {
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min(self.width as f32);
        let y1 = max.y.ceil().min(self.height as f32);
        if !(x0 < x1 && y0 < y1) {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    /// Convert to an 8-bit image.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let p = self.pixels[(y * self.width + x) as usize];
            let c = (p.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
            Rgba([c.x as u8, c.y as u8, c.z as u8, c.w as u8])
        })
    }

    /// Write the canvas to a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        let path = path.as_ref();
        self.to_image().save_with_format(path, image::ImageFormat::Png)?;
        log::info!("wrote {}x{} frame to {}", self.width, self.height, path.display());
        Ok(())
    }
}

impl RenderSurface for Canvas {
    fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    fn fill_rect(&mut self, color: Vec3, alpha: f32) {
        for y in 0..self.height {
            for x in 0..self.width {
                self.blend(x, y, color, alpha);
            }
        }
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Vec3, alpha: f32, blur: f32) {
        if radius <= 0.0 || alpha <= 0.0 {
            return;
        }
        // Half a pixel of feathering even without blur.
        let feather = blur.max(0.5);
        let reach = radius + feather;
        let Some((x0, y0, x1, y1)) = self.clip(center - reach, center + reach) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                let coverage = ((radius + feather - d) / (2.0 * feather)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, alpha * coverage);
                }
            }
        }
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, stops: &[GradientStop], width: f32) {
        if width <= 0.0 || stops.is_empty() {
            return;
        }
        let half = 0.5 * width;
        let reach = half + 1.0;
        let Some((x0, y0, x1, y1)) = self.clip(from.min(to) - reach, from.max(to) + reach) else {
            return;
        };
        let axis = to - from;
        let len_sq = axis.length_squared();

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = if len_sq > 0.0 {
                    ((p - from).dot(axis) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let d = p.distance(from + axis * t);
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    let (color, alpha) = sample_gradient(stops, t);
                    self.blend(x, y, color, alpha * coverage);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visuals::connection_gradient;

    #[test]
    fn test_new_is_opaque_background() {
        let canvas = Canvas::new(4, 3, Vec3::ONE);
        assert_eq!(canvas.pixel(3, 2), Some(Vec4::ONE));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn test_fill_rect_blends() {
        let mut canvas = Canvas::new(2, 2, Vec3::ZERO);
        canvas.fill_rect(Vec3::ONE, 0.5);
        let p = canvas.pixel(0, 0).unwrap();
        assert!((p.x - 0.5).abs() < 1e-6);
        assert_eq!(p.w, 1.0);
    }

    #[test]
    fn test_blend_clamps() {
        let mut canvas = Canvas::new(1, 1, Vec3::ZERO);
        canvas.fill_rect(Vec3::splat(3.0), 2.0);
        assert_eq!(canvas.pixel(0, 0), Some(Vec4::ONE));
        canvas.fill_rect(Vec3::splat(-1.0), -4.0);
        assert_eq!(canvas.pixel(0, 0), Some(Vec4::ONE));
    }

    #[test]
    fn test_circle_covers_centre_not_corner() {
        let mut canvas = Canvas::new(20, 20, Vec3::ZERO);
        canvas.draw_circle(Vec2::new(10.0, 10.0), 4.0, Vec3::X, 1.0, 0.0);
        assert_eq!(canvas.pixel(10, 10).unwrap().x, 1.0);
        assert_eq!(canvas.pixel(0, 0).unwrap().x, 0.0);
    }

    #[test]
    fn test_wash_fades_trails() {
        let mut canvas = Canvas::new(8, 8, Vec3::ONE);
        canvas.draw_circle(Vec2::new(4.0, 4.0), 3.0, Vec3::ZERO, 1.0, 0.0);
        let dark = canvas.pixel(4, 4).unwrap().x;
        for _ in 0..50 {
            canvas.fill_rect(Vec3::ONE, 0.02);
        }
        let faded = canvas.pixel(4, 4).unwrap().x;
        assert!(faded > dark);
        assert!(faded < 1.0);
    }

    #[test]
    fn test_line_uses_gradient() {
        let mut canvas = Canvas::new(30, 5, Vec3::ZERO);
        canvas.draw_line(Vec2::new(0.0, 2.5), Vec2::new(30.0, 2.5), &connection_gradient(1.0), 1.0);
        let edge = canvas.pixel(0, 2).unwrap();
        let middle = canvas.pixel(15, 2).unwrap();
        // Violet middle carries more red than the blue ends.
        assert!(middle.x > edge.x);
        assert_eq!(canvas.pixel(15, 0).unwrap().truncate(), Vec3::ZERO);
    }

    #[test]
    fn test_to_image_dimensions() {
        let canvas = Canvas::new(7, 5, Vec3::new(1.0, 0.0, 0.0));
        let image = canvas.to_image();
        assert_eq!(image.dimensions(), (7, 5));
        assert_eq!(image.get_pixel(6, 4), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        Canvas::new(3, 3, Vec3::ONE).save_png(&path).unwrap();
        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.width(), 3);
    }
}
