//! Game configuration
//!
//! The engine's [`ApplicationConfig`] with the game's window and splash
//! titles. Everything else can be overridden from `digit_world.toml`.

use arcade_engine::core::{ApplicationConfig, Config, ConfigError};
use std::path::Path;

/// Game window caption
pub const GAME_TITLE: &str = "dIGIT WorLd";

/// Splash window caption
pub const SPLASH_TITLE: &str = "Loading...";

/// Default configuration file name, looked up like any other resource
pub const CONFIG_FILE: &str = "digit_world.toml";

/// Configuration used when no file is present
pub fn defaults() -> ApplicationConfig {
    let mut config = ApplicationConfig::new(GAME_TITLE);
    config.splash.title = SPLASH_TITLE.to_string();
    config
}

/// Load the configuration at `path`
///
/// A missing file yields [`defaults`]. The window and splash captions are
/// fixed by the game and always override the file.
pub fn load(path: &Path) -> Result<ApplicationConfig, ConfigError> {
    let mut config = if path.exists() {
        ApplicationConfig::load_from_file(path)?
    } else {
        defaults()
    };

    config.window.title = GAME_TITLE.to_string();
    config.splash.title = SPLASH_TITLE.to_string();
    Ok(config)
}
