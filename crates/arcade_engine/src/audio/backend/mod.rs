//! Audio backend implementations
//!
//! Platform-independent abstraction over the mixing library. The store only
//! ever sees this trait, which keeps it testable without an output device.

#[cfg(feature = "audio")]
pub mod rodio_backend;
pub mod silent_backend;

use crate::audio::{AudioError, MusicLoop};
use std::path::Path;

slotmap::new_key_type! {
    /// Handle to a clip loaded into a backend
    pub struct ClipId;
}

/// Index of a mixing channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub usize);

/// Mixing backend trait for platform abstraction
///
/// Single-threaded: every call happens on the main loop thread, so the
/// trait is not `Send + Sync`.
pub trait MixerBackend {
    /// Short name used in log output
    fn name(&self) -> &'static str;

    /// Open and decode a clip, returning a handle for later playback
    fn load_clip(&mut self, path: &Path) -> Result<ClipId, AudioError>;

    /// Set the playback gain of a loaded clip
    fn set_clip_volume(&mut self, clip: ClipId, volume: f32) -> Result<(), AudioError>;

    /// Find an idle mixing channel, if any
    fn find_free_channel(&mut self) -> Option<ChannelId>;

    /// Play a clip on a specific mixing channel
    fn play_on_channel(&mut self, channel: ChannelId, clip: ClipId) -> Result<(), AudioError>;

    /// Play a clip on its own default channel, cutting off a previous instance
    fn play_clip(&mut self, clip: ClipId) -> Result<(), AudioError>;

    /// Load a music file into the single music channel
    fn load_music(&mut self, path: &Path) -> Result<(), AudioError>;

    /// Start the loaded music from the beginning
    fn play_music(&mut self, loops: MusicLoop) -> Result<(), AudioError>;

    /// Stop music playback
    fn stop_music(&mut self);

    /// Pause music playback
    fn pause_music(&mut self);

    /// Resume paused music
    fn unpause_music(&mut self);

    /// Set music channel gain
    fn set_music_volume(&mut self, volume: f32);

    /// Stop everything and release the output device
    fn shutdown(&mut self);
}

/// Configuration for the audio backend
#[derive(Debug, Clone)]
pub struct AudioBackendConfig {
    /// Sample rate (e.g., 44100, 48000)
    pub sample_rate: u32,
    /// Bits per sample
    pub sample_bits: u16,
    /// Number of output channels (1=mono, 2=stereo)
    pub output_channels: u16,
    /// Buffer size in frames
    pub buffer_size: usize,
    /// Number of mixing channels available to effects
    pub mixing_channels: usize,
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            sample_bits: 16,
            output_channels: 2,
            buffer_size: 256,
            mixing_channels: 8,
        }
    }
}

/// Create the audio backend for the platform
///
/// Falls back to [`silent_backend::SilentBackend`] when no output device can
/// be opened, so the game keeps running without sound.
pub fn create_backend(config: &AudioBackendConfig, enabled: bool) -> Box<dyn MixerBackend> {
    if !enabled {
        log::info!("Audio disabled by configuration, using silent backend");
        return Box::new(silent_backend::SilentBackend::new());
    }

    #[cfg(feature = "audio")]
    {
        match rodio_backend::RodioBackend::new(config) {
            Ok(backend) => return Box::new(backend),
            Err(e) => log::warn!("{}; continuing without sound", e),
        }
    }

    #[cfg(not(feature = "audio"))]
    log::info!(
        "Built without the `audio` feature ({} Hz requested), using silent backend",
        config.sample_rate
    );

    Box::new(silent_backend::SilentBackend::new())
}
