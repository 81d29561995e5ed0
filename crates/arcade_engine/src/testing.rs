//! Test doubles shared by the engine's unit tests

use crate::audio::backend::{ChannelId, ClipId, MixerBackend};
use crate::audio::{AudioClip, AudioError, MusicLoop};
use crate::events::AppEvent;
use crate::loading::{LoadProgress, LoadingView};
use crate::render::{Canvas, Color, Display, RenderError, TextRenderer};
use slotmap::SlotMap;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A call observed by [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Load(PathBuf),
    SetVolume(ClipId, f32),
    PlayOnChannel(ChannelId, ClipId),
    PlayClip(ClipId),
    LoadMusic(PathBuf),
    PlayMusic(MusicLoop),
    StopMusic,
    PauseMusic,
    UnpauseMusic,
    MusicVolume(f32),
    Shutdown,
}

/// Everything the recording backend has seen
#[derive(Debug, Default)]
pub struct BackendLog {
    pub calls: Vec<BackendCall>,
    /// Path and current gain of every clip loaded, by clip
    pub clips: Vec<(ClipId, PathBuf, f32)>,
    /// True while a music track would be audible
    pub music_playing: bool,
}

/// Log handle kept by a test while the backend lives inside a store
pub type SharedLog = Rc<RefCell<BackendLog>>;

impl BackendLog {
    /// Number of plays that reached the backend, pooled or fallback
    pub fn play_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| {
                matches!(call, BackendCall::PlayOnChannel(..) | BackendCall::PlayClip(_))
            })
            .count()
    }

    /// Number of load attempts that reached the backend
    pub fn load_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, BackendCall::Load(_)))
            .count()
    }

    /// Gain of the clip loaded from a file with the given name
    pub fn volume_of(&self, file_name: &str) -> Option<f32> {
        self.clips
            .iter()
            .rev()
            .find(|(_, path, _)| path.file_name().is_some_and(|f| f == file_name))
            .map(|(_, _, volume)| *volume)
    }
}

/// Mixer backend that validates files like the real one and records calls
pub struct RecordingBackend {
    log: SharedLog,
    clips: SlotMap<ClipId, AudioClip>,
    free_channels: usize,
    music_loaded: bool,
}

impl RecordingBackend {
    /// Backend with `free_channels` idle mixing channels
    ///
    /// Each pooled play occupies one channel for the rest of the test.
    pub fn new(free_channels: usize) -> (Self, SharedLog) {
        let log = Rc::new(RefCell::new(BackendLog::default()));
        let backend = Self {
            log: Rc::clone(&log),
            clips: SlotMap::with_key(),
            free_channels,
            music_loaded: false,
        };
        (backend, log)
    }

    fn record(&self, call: BackendCall) {
        self.log.borrow_mut().calls.push(call);
    }
}

impl MixerBackend for RecordingBackend {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn load_clip(&mut self, path: &Path) -> Result<ClipId, AudioError> {
        self.record(BackendCall::Load(path.to_path_buf()));
        let clip = AudioClip::from_file(path)?;
        let volume = clip.volume();
        let id = self.clips.insert(clip);
        self.log
            .borrow_mut()
            .clips
            .push((id, path.to_path_buf(), volume));
        Ok(id)
    }

    fn set_clip_volume(&mut self, clip: ClipId, volume: f32) -> Result<(), AudioError> {
        self.record(BackendCall::SetVolume(clip, volume));
        let entry = self.clips.get_mut(clip).ok_or(AudioError::InvalidClip)?;
        entry.set_volume(volume);
        let applied = entry.volume();

        let mut log = self.log.borrow_mut();
        for (id, _, gain) in log.clips.iter_mut() {
            if *id == clip {
                *gain = applied;
            }
        }
        Ok(())
    }

    fn find_free_channel(&mut self) -> Option<ChannelId> {
        (self.free_channels > 0).then(|| ChannelId(self.free_channels - 1))
    }

    fn play_on_channel(&mut self, channel: ChannelId, clip: ClipId) -> Result<(), AudioError> {
        if !self.clips.contains_key(clip) {
            return Err(AudioError::InvalidClip);
        }
        self.free_channels = self.free_channels.saturating_sub(1);
        self.record(BackendCall::PlayOnChannel(channel, clip));
        Ok(())
    }

    fn play_clip(&mut self, clip: ClipId) -> Result<(), AudioError> {
        if !self.clips.contains_key(clip) {
            return Err(AudioError::InvalidClip);
        }
        self.record(BackendCall::PlayClip(clip));
        Ok(())
    }

    fn load_music(&mut self, path: &Path) -> Result<(), AudioError> {
        self.record(BackendCall::LoadMusic(path.to_path_buf()));
        // Like the rodio backend, a new track replaces the old one up front
        self.music_loaded = false;
        self.log.borrow_mut().music_playing = false;
        AudioClip::from_file(path)?;
        self.music_loaded = true;
        Ok(())
    }

    fn play_music(&mut self, loops: MusicLoop) -> Result<(), AudioError> {
        if !self.music_loaded {
            return Err(AudioError::PlaybackFailed("no music loaded".to_string()));
        }
        self.record(BackendCall::PlayMusic(loops));
        self.log.borrow_mut().music_playing = true;
        Ok(())
    }

    fn stop_music(&mut self) {
        self.record(BackendCall::StopMusic);
        self.log.borrow_mut().music_playing = false;
    }

    fn pause_music(&mut self) {
        self.record(BackendCall::PauseMusic);
    }

    fn unpause_music(&mut self) {
        self.record(BackendCall::UnpauseMusic);
    }

    fn set_music_volume(&mut self, volume: f32) {
        self.record(BackendCall::MusicVolume(volume));
    }

    fn shutdown(&mut self) {
        self.record(BackendCall::Shutdown);
    }
}

/// Font shipped with the repository
pub fn fixture_font(size: f32) -> TextRenderer {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/fonts/font.ttf");
    TextRenderer::from_file(&path, size).unwrap()
}

/// Bounding box `(min_x, min_y, max_x, max_y)` of pixels that differ from
/// `background`
pub fn lit_bounds(canvas: &Canvas, background: Color) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            if canvas.pixel(x, y) == Some(background) {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bounds
}

/// Write a file with a valid MP3 header so format detection accepts it
pub fn write_clip(dir: &Path, file_name: &str) -> PathBuf {
    let path = dir.join(file_name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"ID3\x04\x00\x00\x00\x00\x00\x00").unwrap();
    path
}

/// Loading view that replays scripted events and records progress
#[derive(Default)]
pub struct ScriptedView {
    /// Events returned per poll; an empty queue means no events
    pub polls: VecDeque<Vec<AppEvent>>,
    pub progress: Vec<LoadProgress>,
    pub poll_count: usize,
    /// Fail every present with a display error
    pub fail_present: bool,
}

impl ScriptedView {
    /// View that requests a close on the poll with the given index
    pub fn closing_on_poll(index: usize) -> Self {
        let mut polls: VecDeque<Vec<AppEvent>> = (0..index).map(|_| Vec::new()).collect();
        polls.push_back(vec![AppEvent::CloseRequested]);
        Self {
            polls,
            ..Default::default()
        }
    }

    /// Labels shown so far
    pub fn labels(&self) -> Vec<String> {
        self.progress.iter().map(LoadProgress::label).collect()
    }
}

impl LoadingView for ScriptedView {
    fn poll_events(&mut self) -> Vec<AppEvent> {
        self.poll_count += 1;
        self.polls.pop_front().unwrap_or_default()
    }

    fn show_progress(&mut self, progress: LoadProgress) -> Result<(), RenderError> {
        self.progress.push(progress);
        if self.fail_present {
            return Err(RenderError::Present("scripted failure".to_string()));
        }
        Ok(())
    }
}

/// In-memory display that keeps every presented frame
pub struct FakeDisplay {
    pub size: (u32, u32),
    pub title: String,
    pub frames: Vec<Canvas>,
    /// Events returned per poll; an empty queue means no events
    pub events: VecDeque<Vec<AppEvent>>,
    pub resized_centered: Option<bool>,
    /// Fail every present with a display error
    pub fail_present: bool,
}

impl FakeDisplay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            title: String::new(),
            frames: Vec::new(),
            events: VecDeque::new(),
            resized_centered: None,
            fail_present: false,
        }
    }
}

impl Display for FakeDisplay {
    fn poll_events(&mut self) -> Vec<AppEvent> {
        self.events.pop_front().unwrap_or_default()
    }

    fn present(&mut self, canvas: &Canvas) -> Result<(), RenderError> {
        if self.fail_present {
            return Err(RenderError::Present("scripted failure".to_string()));
        }
        self.frames.push(canvas.clone());
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn resize(&mut self, width: u32, height: u32, centered: bool) -> Result<(), RenderError> {
        self.size = (width, height);
        self.resized_centered = Some(centered);
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }
}
