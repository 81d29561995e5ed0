//! # Unified Configuration System
//!
//! All engine settings in one serializable tree. Every section has defaults,
//! so a config file only needs the keys it wants to change.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: log filter
//! - **Window Config**: game window size, title and frame rate
//! - **Splash Config**: loading screen window, background and font
//! - **Audio Config**: sound directory and mixer parameters

use crate::audio::AudioBackendConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use crate::config::{Config, ConfigError};

/// # Engine Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Window Configuration
///
/// The game window opened after loading finishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Client width in pixels
    pub width: u32,
    /// Client height in pixels
    pub height: u32,
    /// Frame rate of the scene loop
    pub fps: u32,
    /// Center the window on the primary monitor
    pub centered: bool,
}

impl WindowConfig {
    /// Create a window configuration with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width: 800,
            height: 600,
            fps: 60,
            centered: true,
        }
    }

    /// Set the client size
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new("Arcade Engine")
    }
}

/// # Splash Configuration
///
/// The small window shown while assets load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplashConfig {
    /// Splash window title
    pub title: String,
    /// Splash width in pixels
    pub width: u32,
    /// Splash height in pixels
    pub height: u32,
    /// Background image, scaled to the splash size
    pub image_path: PathBuf,
    /// TTF font used for the progress label
    pub font_path: PathBuf,
    /// Progress label size in pixels
    pub font_size: f32,
    /// Frame rate of the loading loop
    pub frame_rate: u32,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            title: "Loading...".to_string(),
            width: 200,
            height: 200,
            image_path: PathBuf::from("assets/pics/splash.png"),
            font_path: PathBuf::from("assets/fonts/font.ttf"),
            font_size: 24.0,
            frame_rate: 60,
        }
    }
}

/// # Audio Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Open an output device; when false everything runs silent
    pub enabled: bool,
    /// Directory sound files are loaded from
    pub sound_dir: PathBuf,
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Bits per sample
    pub sample_bits: u16,
    /// Output channels (1=mono, 2=stereo)
    pub output_channels: u16,
    /// Output buffer size in frames
    pub buffer_size: usize,
    /// Mixing channels shared by sound effects
    pub mixing_channels: usize,
    /// Background music gain
    pub music_volume: f32,
    /// Start with sound muted
    pub start_muted: bool,
}

impl AudioConfig {
    /// Parameters for the mixing backend
    pub fn backend_config(&self) -> AudioBackendConfig {
        AudioBackendConfig {
            sample_rate: self.sample_rate,
            sample_bits: self.sample_bits,
            output_channels: self.output_channels,
            buffer_size: self.buffer_size,
            mixing_channels: self.mixing_channels,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        let backend = AudioBackendConfig::default();
        Self {
            enabled: true,
            sound_dir: PathBuf::from("assets/sound"),
            sample_rate: backend.sample_rate,
            sample_bits: backend.sample_bits,
            output_channels: backend.output_channels,
            buffer_size: backend.buffer_size,
            mixing_channels: backend.mixing_channels,
            music_volume: 1.0,
            start_muted: false,
        }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Game window configuration
    pub window: WindowConfig,
    /// Loading screen configuration
    pub splash: SplashConfig,
    /// Audio configuration
    pub audio: AudioConfig,
}

impl ApplicationConfig {
    /// Create a configuration with defaults and the given window title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            window: WindowConfig::new(title),
            ..Default::default()
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err("Window size must be non-zero".to_string());
        }
        if self.splash.width == 0 || self.splash.height == 0 {
            return Err("Splash size must be non-zero".to_string());
        }
        if self.splash.font_size <= 0.0 {
            return Err("Splash font size must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.audio.music_volume) {
            return Err("Music volume must be between 0.0 and 1.0".to_string());
        }
        Ok(())
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_setup() {
        let config = ApplicationConfig::default();
        assert_eq!((config.window.width, config.window.height), (800, 600));
        assert_eq!(config.window.fps, 60);
        assert_eq!((config.splash.width, config.splash.height), (200, 200));
        assert_eq!(config.splash.title, "Loading...");
        assert_eq!(config.audio.sample_rate, 44100);
        assert_eq!(config.audio.buffer_size, 256);
        assert_eq!(config.audio.mixing_channels, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.toml");
        std::fs::write(&path, "[window]\nwidth = 1024\n\n[audio]\nstart_muted = true\n").unwrap();

        let config = ApplicationConfig::load_from_file(&path).unwrap();
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
        assert!(config.audio.start_muted);
        assert_eq!(config.audio.sound_dir, PathBuf::from("assets/sound"));
    }

    #[test]
    fn test_save_and_reload_ron() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ron");

        let config = ApplicationConfig::new("Test Game");
        config.save_to_file(&path).unwrap();

        let loaded = ApplicationConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.window.title, "Test Game");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        std::fs::write(&path, "{}").unwrap();

        let result = ApplicationConfig::load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.toml");
        std::fs::write(&path, "[window\nwidth = ").unwrap();

        let config = ApplicationConfig::load_or_default(&path);
        assert_eq!(config.window.width, 800);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ApplicationConfig::default();
        config.audio.music_volume = 1.5;
        assert!(config.validate().is_err());

        let mut config = ApplicationConfig::default();
        config.window = config.window.with_size(0, 600);
        assert!(config.validate().is_err());
    }
}
