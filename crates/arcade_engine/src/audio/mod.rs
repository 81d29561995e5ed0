//! Audio system
//!
//! Sound effects and background music for the game. Scenes talk to the
//! [`AudioAssetStore`], which maps logical sound names to clips held by a
//! [`MixerBackend`](backend::MixerBackend) and absorbs every asset failure so
//! that a missing file means silence, never a crash.

pub mod backend;
pub mod channels;
pub mod clip;
pub mod music;
pub mod store;

pub use backend::{create_backend, AudioBackendConfig, ChannelId, ClipId, MixerBackend};
pub use clip::{AudioClip, AudioFormat};
pub use music::{MusicLoop, MusicState};
pub use store::{AudioAssetStore, AudioStats};

use std::path::PathBuf;
use thiserror::Error;

/// Audio-level errors
///
/// These never leave [`AudioAssetStore`]; they exist so the backends can
/// report what went wrong and the store can decide what to log.
#[derive(Error, Debug)]
pub enum AudioError {
    /// Output device could not be opened
    #[error("Audio backend initialization failed: {0}")]
    BackendInitFailed(String),

    /// File does not exist
    #[error("Audio file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File exists but could not be read
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Data is not a supported or valid audio stream
    #[error("Failed to decode '{}': {reason}", path.display())]
    Decode {
        /// File being decoded
        path: PathBuf,
        /// Decoder message
        reason: String,
    },

    /// Clip id does not belong to this backend
    #[error("Invalid clip handle")]
    InvalidClip,

    /// Channel index out of range
    #[error("Invalid mixing channel {0}")]
    InvalidChannel(usize),

    /// Starting playback failed
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}
