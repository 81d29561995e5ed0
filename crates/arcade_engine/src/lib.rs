//! # Arcade Engine
//!
//! A small 2D engine for arcade games: a sound asset store that never crashes
//! the game over a missing file, a splash screen that preloads sounds while
//! showing progress, and a fixed frame rate scene loop.
//!
//! ## Features
//!
//! - **Audio**: named sound effects over a pool of mixing channels, music
//!   with loop control, global mute, warn-once handling of missing assets
//! - **Loading screen**: manifest driven preloading with a live
//!   "Loading k/N" indicator that stays responsive to close requests
//! - **Scenes**: fixed frame rate main loop with scene hand-over
//! - **Presentation**: software canvas shown in a GLFW window through Vulkan
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arcade_engine::prelude::*;
//!
//! struct Title;
//!
//! impl Scene for Title {
//!     fn name(&self) -> &str {
//!         "title"
//!     }
//!
//!     fn handle_events(&mut self, _events: &[AppEvent], audio: &mut AudioAssetStore) {
//!         audio.play("select");
//!     }
//!
//!     fn update(&mut self, _dt: f32, _audio: &mut AudioAssetStore) {}
//!
//!     fn draw(&mut self, canvas: &mut Canvas) {
//!         canvas.fill(colors::BLACK);
//!     }
//!
//!     fn is_running(&self) -> bool {
//!         true
//!     }
//!
//!     fn take_next_scene(&mut self) -> Option<Box<dyn Scene>> {
//!         None
//!     }
//! }
//!
//! fn main() -> Result<(), AppError> {
//!     let config = ApplicationConfig::new("My Game");
//!     let backend = create_backend(&config.audio.backend_config(), config.audio.enabled);
//!     let mut audio = AudioAssetStore::new(backend, &config.audio.sound_dir);
//!     audio.load_sound("select", "select.mp3");
//!
//!     let window = &config.window;
//!     let mut display =
//!         GlfwDisplay::open(&window.title, window.width, window.height, window.centered)?;
//!     MainLoop::new(window.fps).run(&mut display, &mut audio, Box::new(Title))?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Shared configuration
pub mod core;
pub mod config;

pub mod foundation;
pub mod assets;
pub mod audio;
pub mod events;
pub mod input;
pub mod loading;
pub mod render;
pub mod scene;

mod application;
mod engine;

#[cfg(test)]
mod testing;

pub use application::AppError;
pub use engine::{ExitReason, MainLoop};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        AppError, ExitReason, MainLoop,
        audio::{create_backend, AudioAssetStore, MusicLoop},
        core::{ApplicationConfig, Config},
        events::AppEvent,
        input::KeyCode,
        loading::{LoadingOutcome, LoadingSequencer, ManifestEntry, SplashScreen},
        render::{colors, Canvas, Display, GlfwDisplay, TextRenderer},
        scene::Scene,
    };
}
