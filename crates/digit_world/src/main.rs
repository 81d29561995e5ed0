//! dIGIT WorLd
//!
//! Opens a small splash window, preloads every sound effect while showing
//! progress, then grows the window to the game size and runs the title scene.

mod config;
mod manifest;
mod scenes;

use arcade_engine::audio::{create_backend, AudioAssetStore};
use arcade_engine::core::ApplicationConfig;
use arcade_engine::foundation::{logging, paths::resolve_resource};
use arcade_engine::loading::{LoadingOutcome, LoadingSequencer, SplashScreen};
use arcade_engine::render::{Display, GlfwDisplay, TextRenderer};
use arcade_engine::{AppError, MainLoop};
use manifest::SOUND_MANIFEST;
use scenes::TitleScene;

const TITLE_FONT_SIZE: f32 = 48.0;

fn main() -> Result<(), AppError> {
    let (config, config_error) = match config::load(&resolve_resource(config::CONFIG_FILE)) {
        Ok(config) => (config, None),
        Err(e) => (config::defaults(), Some(e)),
    };

    logging::init(&config.engine.log_level);
    if let Some(e) = config_error {
        log::warn!("Ignoring {}: {}", config::CONFIG_FILE, e);
    }
    config.validate().map_err(AppError::Custom)?;

    log::info!("Starting {}", config.window.title);

    let mut audio = open_audio(&config);

    let splash = &config.splash;
    let mut display = GlfwDisplay::open(&splash.title, splash.width, splash.height, false)?;

    let outcome = {
        let mut screen = SplashScreen::new(&mut display, splash);
        LoadingSequencer::new(&SOUND_MANIFEST, splash.frame_rate).run(&mut audio, &mut screen)
    };
    if let LoadingOutcome::Cancelled { attempted } = outcome {
        log::info!("Closed during loading ({} sounds attempted)", attempted);
        return Ok(());
    }

    let window = &config.window;
    display.resize(window.width, window.height, window.centered)?;
    display.set_title(&window.title);

    let title = TitleScene::new(load_title_font(&config));
    let reason = MainLoop::new(window.fps).run(&mut display, &mut audio, Box::new(title))?;

    log::info!("Shutting down ({:?})", reason);
    Ok(())
}

fn open_audio(config: &ApplicationConfig) -> AudioAssetStore {
    let audio_config = &config.audio;
    let backend = create_backend(&audio_config.backend_config(), audio_config.enabled);

    let mut audio = AudioAssetStore::new(backend, resolve_resource(&audio_config.sound_dir));
    audio.set_music_volume(audio_config.music_volume);
    audio.set_muted(audio_config.start_muted);
    audio
}

fn load_title_font(config: &ApplicationConfig) -> Option<TextRenderer> {
    match TextRenderer::from_file(&resolve_resource(&config.splash.font_path), TITLE_FONT_SIZE) {
        Ok(text) => Some(text),
        Err(e) => {
            log::warn!("{}; title text disabled", e);
            None
        }
    }
}
