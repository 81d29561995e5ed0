//! Splash window shown while sounds load

use crate::assets::load_scaled;
use crate::core::SplashConfig;
use crate::events::AppEvent;
use crate::foundation::paths::resolve_resource;
use crate::loading::{LoadProgress, LoadingView};
use crate::render::{colors, Canvas, Display, RenderError, TextRenderer};
use image::RgbaImage;

/// Distance from the bottom edge to the center of the progress label
const LABEL_OFFSET: i64 = 30;
const BAR_HEIGHT: u32 = 8;
const BAR_MARGIN: u32 = 20;

/// Loading view that draws into a [`Display`]
///
/// Draws the splash image (or black if it failed to load) and a centered
/// "Loading k/N" label near the bottom. Without a usable font the label is
/// replaced by a progress bar.
pub struct SplashScreen<'d, D: Display + ?Sized> {
    display: &'d mut D,
    canvas: Canvas,
    background: Option<RgbaImage>,
    text: Option<TextRenderer>,
}

impl<'d, D: Display + ?Sized> SplashScreen<'d, D> {
    /// Load the splash assets named in `config`
    ///
    /// Missing or broken assets are logged and replaced by fallbacks.
    pub fn new(display: &'d mut D, config: &SplashConfig) -> Self {
        let image_path = resolve_resource(&config.image_path);
        let background = match load_scaled(&image_path, config.width, config.height) {
            Ok(image) => Some(image),
            Err(e) => {
                log::warn!("Failed to load splash image: {}", e);
                None
            }
        };

        let font_path = resolve_resource(&config.font_path);
        let text = match TextRenderer::from_file(&font_path, config.font_size) {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("{}; showing a progress bar instead", e);
                None
            }
        };

        Self::with_assets(display, config.width, config.height, background, text)
    }

    /// Build a splash screen from already loaded assets
    pub fn with_assets(
        display: &'d mut D,
        width: u32,
        height: u32,
        background: Option<RgbaImage>,
        text: Option<TextRenderer>,
    ) -> Self {
        Self {
            display,
            canvas: Canvas::new(width, height),
            background,
            text,
        }
    }

    fn draw_background(&mut self) {
        self.canvas.fill(colors::BLACK);
        if let Some(image) = &self.background {
            self.canvas.blit(image, 0, 0);
        }
    }

    fn draw_progress(&mut self, progress: LoadProgress) {
        let width = i64::from(self.canvas.width());
        let height = i64::from(self.canvas.height());

        match &self.text {
            Some(text) => {
                let label = progress.label();
                let center_y = height - LABEL_OFFSET;
                text.draw_centered(&mut self.canvas, &label, width / 2, center_y, colors::WHITE);
            }
            None => {
                let bar_width = self.canvas.width().saturating_sub(2 * BAR_MARGIN);
                let x = i64::from(BAR_MARGIN);
                let y = height - LABEL_OFFSET - i64::from(BAR_HEIGHT / 2);
                self.canvas.progress_bar(x, y, bar_width, BAR_HEIGHT, progress.fraction());
            }
        }
    }

    /// Last frame drawn
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}

impl<D: Display + ?Sized> LoadingView for SplashScreen<'_, D> {
    fn begin(&mut self, _total: usize) -> Result<(), RenderError> {
        self.draw_background();
        self.display.present(&self.canvas)
    }

    fn poll_events(&mut self) -> Vec<AppEvent> {
        self.display.poll_events()
    }

    fn show_progress(&mut self, progress: LoadProgress) -> Result<(), RenderError> {
        self.draw_background();
        self.draw_progress(progress);
        self.display.present(&self.canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture_font, lit_bounds, FakeDisplay};
    use image::Rgba;

    #[test]
    fn test_begin_shows_background() {
        let mut display = FakeDisplay::new(4, 4);
        let background = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 200, 255]));
        let mut splash = SplashScreen::with_assets(&mut display, 4, 4, Some(background), None);

        splash.begin(16).unwrap();

        assert_eq!(display.frames.len(), 1);
        assert_eq!(display.frames[0].pixel(0, 0), Some(Rgba([0, 0, 200, 255])));
    }

    #[test]
    fn test_progress_bar_fallback_without_font() {
        let mut display = FakeDisplay::new(200, 200);
        let mut splash = SplashScreen::with_assets(&mut display, 200, 200, None, None);

        splash.show_progress(LoadProgress { done: 16, total: 16 }).unwrap();
        let frame = splash.canvas().clone();

        // Full bar spans the margins at the label height
        assert_eq!(frame.pixel(100, 170), Some(colors::WHITE));
        assert_eq!(frame.pixel(10, 170), Some(colors::BLACK));
        assert_eq!(frame.pixel(100, 10), Some(colors::BLACK));
        assert_eq!(display.frames.len(), 1);
    }

    #[test]
    fn test_label_is_centered_near_bottom() {
        let mut display = FakeDisplay::new(200, 200);
        let font = Some(fixture_font(24.0));
        let mut splash = SplashScreen::with_assets(&mut display, 200, 200, None, font);

        splash.show_progress(LoadProgress { done: 3, total: 16 }).unwrap();
        let three = splash.canvas().clone();
        splash.show_progress(LoadProgress { done: 4, total: 16 }).unwrap();
        let four = splash.canvas().clone();

        let (x0, y0, x1, y1) = lit_bounds(&three, colors::BLACK).unwrap();
        // Label centre sits at (w/2, h-30)
        assert!((x0 + x1).abs_diff(200) <= 8, "x span {}..{}", x0, x1);
        assert!((y0 + y1).abs_diff(340) <= 12, "y span {}..{}", y0, y1);
        assert!(y0 >= 150 && y1 < 200);

        assert_ne!(three.pixels(), four.pixels());
        assert_eq!(display.frames.len(), 2);
    }

    #[test]
    fn test_missing_assets_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = SplashConfig {
            image_path: dir.path().join("splash.png"),
            font_path: dir.path().join("font.ttf"),
            width: 20,
            height: 20,
            ..Default::default()
        };
        let mut display = FakeDisplay::new(20, 20);
        let mut splash = SplashScreen::new(&mut display, &config);

        splash.begin(1).unwrap();
        assert_eq!(splash.canvas().pixel(0, 0), Some(colors::BLACK));
    }

    #[test]
    fn test_events_come_from_display() {
        let mut display = FakeDisplay::new(4, 4);
        display.events.push_back(vec![AppEvent::CloseRequested]);
        let mut splash = SplashScreen::with_assets(&mut display, 4, 4, None, None);

        assert_eq!(splash.poll_events(), vec![AppEvent::CloseRequested]);
        assert!(splash.poll_events().is_empty());
    }
}
