//! Encoded audio clips
//!
//! A clip keeps the original file bytes and is decoded by the backend each
//! time it is played. Loading only checks that the bytes look like a format
//! the decoder understands.

use crate::audio::AudioError;
use std::path::Path;
use std::sync::Arc;

/// Supported audio formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// WAV uncompressed
    Wav,
    /// OGG Vorbis compressed
    Ogg,
    /// MP3 compressed
    Mp3,
    /// FLAC lossless
    Flac,
    /// Unknown format
    Unknown,
}

impl AudioFormat {
    /// Detect audio format from magic bytes
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.len() < 4 {
            return Self::Unknown;
        }

        match &bytes[0..4] {
            b"RIFF" => Self::Wav,
            b"OggS" => Self::Ogg,
            b"fLaC" => Self::Flac,
            // MP3 can start with an ID3 tag or a frame sync
            [b'I', b'D', b'3', _] => Self::Mp3,
            [0xFF, second, _, _] if second & 0xE0 == 0xE0 => Self::Mp3,
            _ => Self::Unknown,
        }
    }
}

/// Encoded audio data plus its playback gain
#[derive(Clone)]
pub struct AudioClip {
    data: Arc<[u8]>,
    format: AudioFormat,
    volume: f32,
}

impl AudioClip {
    /// Build a clip from encoded bytes
    ///
    /// `path` is only used for error messages.
    pub fn from_bytes(bytes: Vec<u8>, path: &Path) -> Result<Self, AudioError> {
        if bytes.is_empty() {
            return Err(AudioError::Decode {
                path: path.to_path_buf(),
                reason: "empty audio file".to_string(),
            });
        }

        let format = AudioFormat::detect(&bytes);
        if format == AudioFormat::Unknown {
            return Err(AudioError::Decode {
                path: path.to_path_buf(),
                reason: "unknown audio format".to_string(),
            });
        }

        Ok(Self {
            data: bytes.into(),
            format,
            volume: 1.0,
        })
    }

    /// Read and validate a clip from disk
    pub fn from_file(path: &Path) -> Result<Self, AudioError> {
        if !path.is_file() {
            return Err(AudioError::NotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path).map_err(|source| AudioError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_bytes(bytes, path)
    }

    /// Shared handle to the encoded bytes
    pub fn data(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    /// Detected container format
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Playback gain (0.0 to 1.0)
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set playback gain, clamped to 0.0..=1.0
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

impl std::fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioClip")
            .field("format", &self.format)
            .field("bytes", &self.data.len())
            .field("volume", &self.volume)
            .finish()
    }
}
