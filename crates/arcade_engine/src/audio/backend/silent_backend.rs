//! Backend that validates assets but never produces sound
//!
//! Used when no output device is available or the crate is built without
//! the `audio` feature. Clips are still opened and checked, so missing or
//! corrupt files are reported exactly as with the real backend.

use super::{ChannelId, ClipId, MixerBackend};
use crate::audio::{AudioClip, AudioError, MusicLoop};
use slotmap::SlotMap;
use std::path::Path;

/// Silent mixing backend
pub struct SilentBackend {
    clips: SlotMap<ClipId, AudioClip>,
    music_loaded: bool,
}

impl SilentBackend {
    /// Create a new silent backend
    pub fn new() -> Self {
        Self {
            clips: SlotMap::with_key(),
            music_loaded: false,
        }
    }

    /// Number of clips loaded so far
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }
}

impl Default for SilentBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MixerBackend for SilentBackend {
    fn name(&self) -> &'static str {
        "silent"
    }

    fn load_clip(&mut self, path: &Path) -> Result<ClipId, AudioError> {
        let clip = AudioClip::from_file(path)?;
        Ok(self.clips.insert(clip))
    }

    fn set_clip_volume(&mut self, clip: ClipId, volume: f32) -> Result<(), AudioError> {
        let clip = self.clips.get_mut(clip).ok_or(AudioError::InvalidClip)?;
        clip.set_volume(volume);
        Ok(())
    }

    fn find_free_channel(&mut self) -> Option<ChannelId> {
        None
    }

    fn play_on_channel(&mut self, channel: ChannelId, _clip: ClipId) -> Result<(), AudioError> {
        Err(AudioError::InvalidChannel(channel.0))
    }

    fn play_clip(&mut self, clip: ClipId) -> Result<(), AudioError> {
        if self.clips.contains_key(clip) {
            Ok(())
        } else {
            Err(AudioError::InvalidClip)
        }
    }

    fn load_music(&mut self, path: &Path) -> Result<(), AudioError> {
        AudioClip::from_file(path)?;
        self.music_loaded = true;
        Ok(())
    }

    fn play_music(&mut self, _loops: MusicLoop) -> Result<(), AudioError> {
        if self.music_loaded {
            Ok(())
        } else {
            Err(AudioError::PlaybackFailed("no music loaded".to_string()))
        }
    }

    fn stop_music(&mut self) {}

    fn pause_music(&mut self) {}

    fn unpause_music(&mut self) {}

    fn set_music_volume(&mut self, _volume: f32) {}

    fn shutdown(&mut self) {
        self.clips.clear();
        self.music_loaded = false;
    }
}
