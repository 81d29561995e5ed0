//! Software canvas
//!
//! A thin layer over [`image::RgbaImage`]. All drawing operations clip to the
//! canvas bounds, so callers can pass positions partly or fully off-screen.

use image::{imageops, Rgba, RgbaImage};

/// RGBA color
pub type Color = Rgba<u8>;

/// Common colors
pub mod colors {
    use super::Color;
    use image::Rgba;

    /// Opaque black
    pub const BLACK: Color = Rgba([0, 0, 0, 255]);
    /// Opaque white
    pub const WHITE: Color = Rgba([255, 255, 255, 255]);
    /// Dark grey used for empty progress bars
    pub const DARK_GREY: Color = Rgba([48, 48, 48, 255]);
}

/// CPU-side frame buffer
#[derive(Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Create a black canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, colors::BLACK),
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw RGBA bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Read one pixel, `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image.get_pixel_checked(x, y).copied()
    }

    /// Resize, discarding the current contents
    pub fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::from_pixel(width, height, colors::BLACK);
    }

    /// Fill the whole canvas
    pub fn fill(&mut self, color: Color) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// Fill a rectangle
    pub fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(x, y, width, height) else {
            return;
        };
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px, py, color);
            }
        }
    }

    /// Draw an image with its top-left corner at `(x, y)`, alpha blended
    pub fn blit(&mut self, source: &RgbaImage, x: i64, y: i64) {
        imageops::overlay(&mut self.image, source, x, y);
    }

    /// Blend `color` through an 8-bit coverage mask, as produced by a glyph
    /// rasterizer
    pub fn draw_coverage(&mut self, mask: &[u8], width: usize, x: i64, y: i64, color: Color) {
        if width == 0 {
            return;
        }
        for (row, line) in mask.chunks(width).enumerate() {
            let py = y + row as i64;
            if py < 0 || py >= i64::from(self.height()) {
                continue;
            }
            for (col, &coverage) in line.iter().enumerate() {
                let px = x + col as i64;
                if coverage == 0 || px < 0 || px >= i64::from(self.width()) {
                    continue;
                }
                let dst = self.image.get_pixel_mut(px as u32, py as u32);
                *dst = blend(*dst, color, coverage);
            }
        }
    }

    /// Draw a horizontal progress bar; `fraction` is clamped to 0.0..=1.0
    pub fn progress_bar(&mut self, x: i64, y: i64, width: u32, height: u32, fraction: f32) {
        self.fill_rect(x, y, width, height, colors::DARK_GREY);
        let filled = (width as f32 * fraction.clamp(0.0, 1.0)).round() as u32;
        self.fill_rect(x, y, filled, height, colors::WHITE);
    }

    fn clip(&self, x: i64, y: i64, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(width)).min(i64::from(self.width()));
        let y1 = (y + i64::from(height)).min(i64::from(self.height()));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

fn blend(dst: Color, src: Color, coverage: u8) -> Color {
    let alpha = u16::from(coverage) * u16::from(src[3]) / 255;
    let mix = |d: u8, s: u8| ((u16::from(s) * alpha + u16::from(d) * (255 - alpha)) / 255) as u8;
    Rgba([mix(dst[0], src[0]), mix(dst[1], src[1]), mix(dst[2], src[2]), dst[3].max(alpha as u8)])
}
