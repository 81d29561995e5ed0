//! Text rasterization with `fontdue`
//!
//! Glyphs are rasterized on demand and blended directly into a [`Canvas`].
//! Only single-line labels are supported.

use crate::render::{Canvas, Color, RenderError};
use fontdue::{Font, FontSettings};
use std::path::Path;

/// Renders text in one font at one pixel size
pub struct TextRenderer {
    font: Font,
    size: f32,
}

impl TextRenderer {
    /// Load a TrueType/OpenType font from disk
    pub fn from_file(path: &Path, size: f32) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path)
            .map_err(|e| RenderError::Font(format!("Failed to read '{}': {}", path.display(), e)))?;
        Self::from_bytes(&bytes, size)
    }

    /// Load a font from memory
    pub fn from_bytes(bytes: &[u8], size: f32) -> Result<Self, RenderError> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| RenderError::Font(format!("fontdue error: {}", e)))?;
        Ok(Self { font, size })
    }

    fn ascent(&self) -> f32 {
        self.font
            .horizontal_line_metrics(self.size)
            .map_or(self.size, |metrics| metrics.ascent)
    }

    fn line_height(&self) -> f32 {
        self.font
            .horizontal_line_metrics(self.size)
            .map_or(self.size, |metrics| metrics.ascent - metrics.descent)
    }

    /// Size of `text` in pixels
    pub fn measure(&self, text: &str) -> (u32, u32) {
        let width: f32 = text
            .chars()
            .map(|c| self.font.metrics(c, self.size).advance_width)
            .sum();
        (width.ceil() as u32, self.line_height().ceil() as u32)
    }

    /// Draw `text` with its top-left corner at `(x, y)`
    pub fn draw(&self, canvas: &mut Canvas, text: &str, x: i64, y: i64, color: Color) {
        let baseline = y as f32 + self.ascent();
        let mut pen = x as f32;

        for c in text.chars() {
            let (metrics, coverage) = self.font.rasterize(c, self.size);
            let glyph_x = (pen + metrics.xmin as f32).round() as i64;
            let glyph_y = (baseline - (metrics.ymin as f32 + metrics.height as f32)).round() as i64;
            canvas.draw_coverage(&coverage, metrics.width, glyph_x, glyph_y, color);
            pen += metrics.advance_width;
        }
    }

    /// Draw `text` centered on `(center_x, center_y)`
    pub fn draw_centered(
        &self,
        canvas: &mut Canvas,
        text: &str,
        center_x: i64,
        center_y: i64,
        color: Color,
    ) {
        let (width, height) = self.measure(text);
        let x = center_x - i64::from(width) / 2;
        let y = center_y - i64::from(height) / 2;
        self.draw(canvas, text, x, y, color);
    }
}
