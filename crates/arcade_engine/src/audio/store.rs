//! Named sound registry
//!
//! [`AudioAssetStore`] is what scenes see of the audio system. Sounds are
//! addressed by logical name ("jump", "pickup", ...); the store resolves the
//! name to a backend clip, routes playback to a free mixing channel and turns
//! every load or playback failure into a log line. Asking for a sound that
//! never loaded is not an error: it warns once and stays silent afterwards.

use crate::audio::backend::{ClipId, MixerBackend};
use crate::audio::{AudioError, MusicLoop, MusicState};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Playback counters, mostly useful in logs and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AudioStats {
    /// Effects started on a free mixing channel
    pub dispatched: u64,
    /// Effects started on the clip's own channel because the pool was full
    pub fallback_plays: u64,
    /// Play requests dropped because the store is muted
    pub muted_suppressed: u64,
    /// Warnings logged for missing sounds or music files
    pub missing_warnings: u64,
}

/// Owns loaded sounds and the mute flag
pub struct AudioAssetStore {
    backend: Box<dyn MixerBackend>,
    sound_dir: PathBuf,
    registry: HashMap<String, ClipId>,
    missing: HashSet<String>,
    warned: HashSet<String>,
    muted: bool,
    music_state: MusicState,
    stats: AudioStats,
}

impl AudioAssetStore {
    /// Create a store reading sound files from `sound_dir`
    pub fn new(backend: Box<dyn MixerBackend>, sound_dir: impl Into<PathBuf>) -> Self {
        let sound_dir = sound_dir.into();
        log::debug!(
            "Audio store using '{}' backend, sounds from {}",
            backend.name(),
            sound_dir.display()
        );

        Self {
            backend,
            sound_dir,
            registry: HashMap::new(),
            missing: HashSet::new(),
            warned: HashSet::new(),
            muted: false,
            music_state: MusicState::Stopped,
            stats: AudioStats::default(),
        }
    }

    /// Load `file_name` from the sound directory under the logical `name`
    ///
    /// On failure the name is marked missing and a warning is logged. If the
    /// name was already loaded, the previous clip stays registered.
    pub fn load_sound(&mut self, name: &str, file_name: &str) {
        let path = self.sound_dir.join(file_name);

        match self.backend.load_clip(&path) {
            Ok(clip) => {
                log::debug!("Loaded sound '{}' from {}", name, path.display());
                self.registry.insert(name.to_string(), clip);
                self.missing.remove(name);
                self.warned.remove(name);
            }
            Err(e) => {
                log::warn!("Failed to load sound '{}' from '{}': {}", name, path.display(), e);
                if self.registry.contains_key(name) {
                    return;
                }
                self.missing.insert(name.to_string());
                if self.warned.insert(name.to_string()) {
                    self.stats.missing_warnings += 1;
                }
            }
        }
    }

    /// Set the gain of a loaded sound, clamped to 0.0..=1.0
    pub fn set_volume(&mut self, name: &str, volume: f32) {
        let Some(&clip) = self.registry.get(name) else {
            self.warn_missing(name);
            return;
        };

        let clamped = clamp_volume(volume);
        if clamped != volume {
            log::debug!("Volume {} for '{}' clamped to {}", volume, name, clamped);
        }

        if let Err(e) = self.backend.set_clip_volume(clip, clamped) {
            log::warn!("Failed to set volume of '{}': {}", name, e);
        }
    }

    /// Play a sound effect by name
    ///
    /// Overlapping plays use separate mixing channels. When all of them are
    /// busy the sound restarts on its own channel, cutting off the previous
    /// instance of the same sound.
    pub fn play(&mut self, name: &str) {
        if self.muted {
            self.stats.muted_suppressed += 1;
            return;
        }

        let Some(&clip) = self.registry.get(name) else {
            self.warn_missing(name);
            return;
        };

        let result = match self.backend.find_free_channel() {
            Some(channel) => self.backend.play_on_channel(channel, clip).map(|()| {
                self.stats.dispatched += 1;
            }),
            None => self.backend.play_clip(clip).map(|()| {
                self.stats.fallback_plays += 1;
            }),
        };

        if let Err(e) = result {
            log::warn!("Failed to play sound '{}': {}", name, e);
        }
    }

    /// Flip the mute flag and return the new value
    ///
    /// Sounds already playing are not interrupted.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        log::info!("Sound {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    /// Set the mute flag directly
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// True while play requests are ignored
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Start background music from the sound directory
    pub fn play_music(&mut self, file_name: &str, loops: MusicLoop) {
        if self.muted {
            self.stats.muted_suppressed += 1;
            return;
        }

        let path = self.sound_dir.join(file_name);
        if !path.exists() {
            if self.warned.insert(file_name.to_string()) {
                self.stats.missing_warnings += 1;
                log::warn!("Music file not found: {}", path.display());
            }
            return;
        }

        match self.start_music(&path, loops) {
            Ok(()) => {
                log::debug!("Playing music {} ({:?})", path.display(), loops);
                self.music_state = MusicState::Playing;
            }
            Err(e) => {
                log::warn!("Error loading music '{}' from '{}': {}", file_name, path.display(), e);
                // Loading a new track already dropped the old one
                self.backend.stop_music();
                self.music_state = MusicState::Stopped;
            }
        }
    }

    fn start_music(&mut self, path: &Path, loops: MusicLoop) -> Result<(), AudioError> {
        self.backend.load_music(path)?;
        self.backend.play_music(loops)
    }

    /// Stop background music
    pub fn stop_music(&mut self) {
        if self.music_state != MusicState::Stopped {
            self.backend.stop_music();
            self.music_state = MusicState::Stopped;
        }
    }

    /// Pause background music
    pub fn pause_music(&mut self) {
        if self.music_state == MusicState::Playing {
            self.backend.pause_music();
        }
        self.music_state = self.music_state.paused();
    }

    /// Resume paused background music
    pub fn unpause_music(&mut self) {
        if self.music_state == MusicState::Paused {
            self.backend.unpause_music();
        }
        self.music_state = self.music_state.resumed();
    }

    /// Set the music gain, clamped to 0.0..=1.0
    pub fn set_music_volume(&mut self, volume: f32) {
        self.backend.set_music_volume(clamp_volume(volume));
    }

    /// Current music state
    pub fn music_state(&self) -> MusicState {
        self.music_state
    }

    /// True if `name` is registered and playable
    pub fn is_loaded(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    /// True if `name` failed to load or was requested without being loaded
    pub fn is_missing(&self, name: &str) -> bool {
        self.missing.contains(name)
    }

    /// Number of playable sounds
    pub fn loaded_count(&self) -> usize {
        self.registry.len()
    }

    /// Missing names, sorted
    pub fn missing_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.missing.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Playback counters
    pub fn stats(&self) -> AudioStats {
        self.stats
    }

    /// Directory sound files are read from
    pub fn sound_dir(&self) -> &Path {
        &self.sound_dir
    }

    fn warn_missing(&mut self, name: &str) {
        if !self.registry.contains_key(name) {
            self.missing.insert(name.to_string());
        }
        if self.warned.insert(name.to_string()) {
            self.stats.missing_warnings += 1;
            log::warn!("Sound '{}' is not registered", name);
        }
    }
}

/// Clamp a gain to 0.0..=1.0; NaN and infinities mute
fn clamp_volume(volume: f32) -> f32 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl Drop for AudioAssetStore {
    fn drop(&mut self) {
        self.backend.shutdown();
    }
}
