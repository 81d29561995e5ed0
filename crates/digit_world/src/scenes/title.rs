//! Title screen

use arcade_engine::audio::AudioAssetStore;
use arcade_engine::events::AppEvent;
use arcade_engine::input::KeyCode;
use arcade_engine::render::{colors, Canvas, TextRenderer};
use arcade_engine::scene::Scene;

/// Blink period of the start prompt in seconds
const BLINK_PERIOD: f32 = 1.0;
const PROMPT: &str = "PRESS ENTER";
const PROMPT_BAR: (u32, u32) = (160, 8);

/// Title screen with a blinking prompt
///
/// Enter confirms with the select sound, M toggles mute and Escape quits.
/// Losing window focus pauses the music.
pub struct TitleScene {
    text: Option<TextRenderer>,
    elapsed: f32,
    running: bool,
}

impl TitleScene {
    /// Create the scene; without a font the prompt is drawn as a bar
    pub fn new(text: Option<TextRenderer>) -> Self {
        Self {
            text,
            elapsed: 0.0,
            running: true,
        }
    }

    fn prompt_visible(&self) -> bool {
        self.elapsed % BLINK_PERIOD < BLINK_PERIOD / 2.0
    }
}

impl Scene for TitleScene {
    fn name(&self) -> &str {
        "title"
    }

    fn enter(&mut self, audio: &mut AudioAssetStore) {
        audio.play("title_in");
    }

    fn handle_events(&mut self, events: &[AppEvent], audio: &mut AudioAssetStore) {
        for event in events {
            match event {
                AppEvent::KeyPressed(KeyCode::Escape) => self.running = false,
                AppEvent::KeyPressed(KeyCode::Enter) => audio.play("select"),
                AppEvent::KeyPressed(KeyCode::M) => {
                    if !audio.toggle_mute() {
                        audio.play("select");
                    }
                }
                AppEvent::FocusChanged(false) => audio.pause_music(),
                AppEvent::FocusChanged(true) => audio.unpause_music(),
                _ => {}
            }
        }
    }

    fn update(&mut self, dt: f32, _audio: &mut AudioAssetStore) {
        self.elapsed += dt;
    }

    fn draw(&mut self, canvas: &mut Canvas) {
        canvas.fill(colors::BLACK);

        let center_x = i64::from(canvas.width() / 2);
        let title_y = i64::from(canvas.height() / 3);
        let prompt_y = i64::from(canvas.height() * 2 / 3);
        let visible = self.prompt_visible();

        match &self.text {
            Some(text) => {
                let title = crate::config::GAME_TITLE;
                text.draw_centered(canvas, title, center_x, title_y, colors::WHITE);
                if visible {
                    text.draw_centered(canvas, PROMPT, center_x, prompt_y, colors::WHITE);
                }
            }
            None if visible => {
                let (width, height) = PROMPT_BAR;
                canvas.fill_rect(
                    center_x - i64::from(width / 2),
                    prompt_y - i64::from(height / 2),
                    width,
                    height,
                    colors::WHITE,
                );
            }
            None => {}
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn take_next_scene(&mut self) -> Option<Box<dyn Scene>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_engine::audio::backend::silent_backend::SilentBackend;
    use std::io::Write;
    use std::path::Path;

    fn store_with(dir: &Path, names: &[&str]) -> AudioAssetStore {
        let mut store = AudioAssetStore::new(Box::new(SilentBackend::new()), dir);
        for name in names {
            let file_name = format!("{}.mp3", name);
            std::fs::File::create(dir.join(&file_name))
                .unwrap()
                .write_all(b"ID3\x04\x00\x00\x00\x00\x00\x00")
                .unwrap();
            store.load_sound(name, &file_name);
        }
        store
    }

    #[test]
    fn test_enter_plays_title_jingle() {
        let dir = tempfile::tempdir().unwrap();
        let mut audio = store_with(dir.path(), &["title_in"]);
        let mut scene = TitleScene::new(None);

        scene.enter(&mut audio);
        assert_eq!(audio.stats().fallback_plays, 1);
    }

    #[test]
    fn test_mute_key_silences_select() {
        let dir = tempfile::tempdir().unwrap();
        let mut audio = store_with(dir.path(), &["select"]);
        let mut scene = TitleScene::new(None);

        scene.handle_events(
            &[AppEvent::KeyPressed(KeyCode::M), AppEvent::KeyPressed(KeyCode::Enter)],
            &mut audio,
        );
        assert!(audio.is_muted());
        assert_eq!(audio.stats().muted_suppressed, 1);
        assert_eq!(audio.stats().fallback_plays, 0);

        // Unmuting confirms with the select sound
        scene.handle_events(&[AppEvent::KeyPressed(KeyCode::M)], &mut audio);
        assert!(!audio.is_muted());
        assert_eq!(audio.stats().fallback_plays, 1);
    }

    #[test]
    fn test_escape_stops_scene() {
        let dir = tempfile::tempdir().unwrap();
        let mut audio = store_with(dir.path(), &[]);
        let mut scene = TitleScene::new(None);

        scene.handle_events(&[AppEvent::KeyReleased(KeyCode::Escape)], &mut audio);
        assert!(scene.is_running());
        scene.handle_events(&[AppEvent::KeyPressed(KeyCode::Escape)], &mut audio);
        assert!(!scene.is_running());
        assert!(scene.take_next_scene().is_none());
    }

    #[test]
    fn test_prompt_blinks() {
        let dir = tempfile::tempdir().unwrap();
        let mut audio = store_with(dir.path(), &[]);
        let mut scene = TitleScene::new(None);
        let mut canvas = Canvas::new(800, 600);

        scene.draw(&mut canvas);
        assert_eq!(canvas.pixel(400, 400), Some(colors::WHITE));

        scene.update(0.75, &mut audio);
        scene.draw(&mut canvas);
        assert_eq!(canvas.pixel(400, 400), Some(colors::BLACK));

        scene.update(0.5, &mut audio);
        scene.draw(&mut canvas);
        assert_eq!(canvas.pixel(400, 400), Some(colors::WHITE));
    }
}
