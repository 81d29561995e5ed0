//! Scene interface driven by the main loop
//!
//! A scene owns one screen of the game. The main loop hands it the events of
//! each frame, advances it, lets it draw and finally asks whether it wants to
//! hand over to another scene.

use crate::audio::AudioAssetStore;
use crate::events::AppEvent;
use crate::render::Canvas;

/// One screen of the game
pub trait Scene {
    /// Name used in log messages
    fn name(&self) -> &str;

    /// Called once when the scene becomes active
    fn enter(&mut self, _audio: &mut AudioAssetStore) {}

    /// React to the events collected this frame
    fn handle_events(&mut self, events: &[AppEvent], audio: &mut AudioAssetStore);

    /// Advance the scene by `dt` seconds
    fn update(&mut self, dt: f32, audio: &mut AudioAssetStore);

    /// Draw the current frame
    fn draw(&mut self, canvas: &mut Canvas);

    /// Whether the scene wants to keep running
    fn is_running(&self) -> bool;

    /// Scene to switch to, if any
    ///
    /// Polled after every frame. Returning `Some` ends this scene.
    fn take_next_scene(&mut self) -> Option<Box<dyn Scene>>;

    /// Called once when the scene is left, before the next one enters
    fn cleanup(&mut self, _audio: &mut AudioAssetStore) {}
}
