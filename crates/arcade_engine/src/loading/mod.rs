//! Startup asset loading
//!
//! [`LoadingSequencer`] walks a compiled-in sound manifest, loads every entry
//! into the [`AudioAssetStore`] and repaints a progress view after each one.
//! Loading is synchronous; between entries the view's events are drained so
//! a close request is honored before the next file is touched.

mod splash;

pub use splash::SplashScreen;

use crate::audio::AudioAssetStore;
use crate::events::{close_requested, AppEvent};
use crate::foundation::time::FrameClock;
use crate::render::RenderError;
use std::time::{Duration, Instant};

/// One sound to preload: logical name, file in the sound directory, gain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManifestEntry {
    /// Logical name scenes use to play the sound
    pub name: &'static str,
    /// File name relative to the sound directory
    pub file: &'static str,
    /// Playback gain, 0.0 to 1.0
    pub volume: f32,
}

impl ManifestEntry {
    /// Create a manifest entry
    pub const fn new(name: &'static str, file: &'static str, volume: f32) -> Self {
        Self { name, file, volume }
    }
}

/// How far loading has come
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    /// Entries attempted so far
    pub done: usize,
    /// Entries in the manifest
    pub total: usize,
}

impl LoadProgress {
    /// Text shown on the loading screen, e.g. `Loading 3/16`
    pub fn label(&self) -> String {
        format!("Loading {}/{}", self.done, self.total)
    }

    /// Completed fraction, 1.0 for an empty manifest
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.done as f32 / self.total as f32
        }
    }
}

/// Something that can show loading progress and report window events
pub trait LoadingView {
    /// Called once before the first entry
    fn begin(&mut self, _total: usize) -> Result<(), RenderError> {
        Ok(())
    }

    /// Drain pending window events
    fn poll_events(&mut self) -> Vec<AppEvent>;

    /// Repaint with the given progress and present it
    fn show_progress(&mut self, progress: LoadProgress) -> Result<(), RenderError>;
}

/// Result of a completed loading pass
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSummary {
    /// Manifest entries that are playable
    pub loaded: usize,
    /// Manifest names that failed to load
    pub missing: Vec<&'static str>,
    /// Wall time spent loading
    pub elapsed: Duration,
}

/// How loading ended
#[derive(Debug, Clone, PartialEq)]
pub enum LoadingOutcome {
    /// Every entry was attempted
    Completed(LoadSummary),
    /// A close request arrived; only the first `attempted` entries were tried
    Cancelled {
        /// Entries attempted before the close request
        attempted: usize,
    },
}

/// Drives the loading screen over a manifest
pub struct LoadingSequencer<'m> {
    manifest: &'m [ManifestEntry],
    frame_rate: u32,
}

impl<'m> LoadingSequencer<'m> {
    /// Create a sequencer throttled to `frame_rate` repaints per second
    ///
    /// A frame rate of zero disables throttling.
    pub fn new(manifest: &'m [ManifestEntry], frame_rate: u32) -> Self {
        Self { manifest, frame_rate }
    }

    /// Load every entry in order, stopping early on a close request
    ///
    /// Display failures are logged and loading continues without feedback.
    pub fn run(&self, store: &mut AudioAssetStore, view: &mut dyn LoadingView) -> LoadingOutcome {
        let total = self.manifest.len();
        let started = Instant::now();
        let mut clock = FrameClock::new();
        let mut display_failed = false;

        log::info!("Loading {} sounds from {}", total, store.sound_dir().display());
        if let Err(e) = view.begin(total) {
            log::warn!("Loading screen unavailable: {}", e);
            display_failed = true;
        }

        for (index, entry) in self.manifest.iter().enumerate() {
            if close_requested(&view.poll_events()) {
                log::info!("Loading cancelled after {} of {} sounds", index, total);
                return LoadingOutcome::Cancelled { attempted: index };
            }

            store.load_sound(entry.name, entry.file);
            store.set_volume(entry.name, entry.volume);

            let progress = LoadProgress { done: index + 1, total };
            log::debug!("{} ({})", progress.label(), entry.name);
            if let Err(e) = view.show_progress(progress) {
                if !display_failed {
                    log::warn!("Failed to draw loading screen: {}", e);
                    display_failed = true;
                }
            }

            clock.tick(self.frame_rate);
        }

        let missing: Vec<&'static str> = self
            .manifest
            .iter()
            .filter(|entry| !store.is_loaded(entry.name))
            .map(|entry| entry.name)
            .collect();
        let summary = LoadSummary {
            loaded: total - missing.len(),
            missing,
            elapsed: started.elapsed(),
        };

        log::info!(
            "Loaded {}/{} sounds in {:.0} ms",
            summary.loaded,
            total,
            summary.elapsed.as_secs_f32() * 1000.0
        );
        if !summary.missing.is_empty() {
            log::warn!("Missing sounds: {}", summary.missing.join(", "));
        }

        LoadingOutcome::Completed(summary)
    }
}
