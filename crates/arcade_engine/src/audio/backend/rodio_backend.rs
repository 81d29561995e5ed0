//! Rodio audio backend implementation
//!
//! Uses the Rodio library for cross-platform playback of WAV, OGG Vorbis,
//! MP3 and FLAC. Every mixing channel is a [`Sink`]; a clip played outside
//! the channel pool gets a dedicated sink that is replaced on every play, so
//! a new instance cuts off the previous one.

use super::{AudioBackendConfig, ChannelId, ClipId, MixerBackend};
use crate::audio::channels::{ChannelPool, MixChannel};
use crate::audio::{AudioClip, AudioError, MusicLoop};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use slotmap::{SecondaryMap, SlotMap};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

/// A rodio sink used as a mixing channel
struct SinkChannel {
    sink: Sink,
}

impl MixChannel for SinkChannel {
    fn is_busy(&self) -> bool {
        !self.sink.empty()
    }
}

/// Rodio-based mixing backend
pub struct RodioBackend {
    /// Audio output stream (must be kept alive)
    _output_stream: OutputStream,
    /// Output stream handle for creating sinks
    stream_handle: OutputStreamHandle,
    /// Pooled mixing channels
    channels: ChannelPool<SinkChannel>,
    /// Loaded clips
    clips: SlotMap<ClipId, AudioClip>,
    /// Per-clip default sinks used when the pool is exhausted
    default_sinks: SecondaryMap<ClipId, Sink>,
    /// Encoded bytes of the loaded music track
    music: Option<Arc<[u8]>>,
    /// Sink currently playing music
    music_sink: Option<Sink>,
    music_volume: f32,
}

impl RodioBackend {
    /// Open the default output device and allocate the mixing channels
    ///
    /// Rodio negotiates the stream format with the device, so the requested
    /// sample format in `config` is only advisory.
    pub fn new(config: &AudioBackendConfig) -> Result<Self, AudioError> {
        let (output_stream, stream_handle) = OutputStream::try_default().map_err(|e| {
            AudioError::BackendInitFailed(format!("Failed to open audio output: {}", e))
        })?;

        let mut sinks = Vec::with_capacity(config.mixing_channels);
        for _ in 0..config.mixing_channels {
            let sink = Sink::try_new(&stream_handle).map_err(|e| {
                AudioError::BackendInitFailed(format!("Failed to create mixing channel: {}", e))
            })?;
            sinks.push(SinkChannel { sink });
        }

        log::info!(
            "Rodio audio backend initialized ({} Hz, {}-bit, {} outputs, buffer {}, {} channels)",
            config.sample_rate,
            config.sample_bits,
            config.output_channels,
            config.buffer_size,
            config.mixing_channels
        );

        Ok(Self {
            _output_stream: output_stream,
            stream_handle,
            channels: ChannelPool::new(sinks),
            clips: SlotMap::with_key(),
            default_sinks: SecondaryMap::new(),
            music: None,
            music_sink: None,
            music_volume: 1.0,
        })
    }

    fn new_sink(&self) -> Result<Sink, AudioError> {
        Sink::try_new(&self.stream_handle)
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to create sink: {}", e)))
    }

    fn decode(data: Arc<[u8]>) -> Result<Decoder<Cursor<Arc<[u8]>>>, AudioError> {
        Decoder::new(Cursor::new(data))
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to decode audio: {}", e)))
    }

    fn clip(&self, clip: ClipId) -> Result<&AudioClip, AudioError> {
        self.clips.get(clip).ok_or(AudioError::InvalidClip)
    }
}

impl MixerBackend for RodioBackend {
    fn name(&self) -> &'static str {
        "rodio"
    }

    fn load_clip(&mut self, path: &Path) -> Result<ClipId, AudioError> {
        let clip = AudioClip::from_file(path)?;

        // Catch corrupt files at load time instead of on first play
        Decoder::new(Cursor::new(clip.data())).map_err(|e| AudioError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(self.clips.insert(clip))
    }

    fn set_clip_volume(&mut self, clip: ClipId, volume: f32) -> Result<(), AudioError> {
        let clip = self.clips.get_mut(clip).ok_or(AudioError::InvalidClip)?;
        clip.set_volume(volume);
        Ok(())
    }

    fn find_free_channel(&mut self) -> Option<ChannelId> {
        self.channels.find_free()
    }

    fn play_on_channel(&mut self, channel: ChannelId, clip: ClipId) -> Result<(), AudioError> {
        let clip = self.clip(clip)?;
        let source = Self::decode(clip.data())?.amplify(clip.volume());

        let channel = self
            .channels
            .get(channel)
            .ok_or(AudioError::InvalidChannel(channel.0))?;
        channel.sink.append(source);
        channel.sink.play();
        Ok(())
    }

    fn play_clip(&mut self, clip_id: ClipId) -> Result<(), AudioError> {
        let clip = self.clip(clip_id)?;
        let source = Self::decode(clip.data())?.amplify(clip.volume());

        let sink = self.new_sink()?;
        sink.append(source);

        // Dropping the previous sink stops its sound
        if let Some(previous) = self.default_sinks.insert(clip_id, sink) {
            previous.stop();
        }
        Ok(())
    }

    fn load_music(&mut self, path: &Path) -> Result<(), AudioError> {
        let clip = AudioClip::from_file(path)?;
        if let Some(sink) = self.music_sink.take() {
            sink.stop();
        }
        self.music = Some(clip.data());
        Ok(())
    }

    fn play_music(&mut self, loops: MusicLoop) -> Result<(), AudioError> {
        let data = self
            .music
            .clone()
            .ok_or_else(|| AudioError::PlaybackFailed("no music loaded".to_string()))?;

        let sink = self.new_sink()?;
        match loops.passes() {
            None => {
                let source = Decoder::new_looped(Cursor::new(data)).map_err(|e| {
                    AudioError::PlaybackFailed(format!("Failed to decode music: {}", e))
                })?;
                sink.append(source);
            }
            Some(passes) => {
                for _ in 0..passes {
                    sink.append(Self::decode(Arc::clone(&data))?);
                }
            }
        }
        sink.set_volume(self.music_volume);

        if let Some(previous) = self.music_sink.replace(sink) {
            previous.stop();
        }
        Ok(())
    }

    fn stop_music(&mut self) {
        if let Some(sink) = self.music_sink.take() {
            sink.stop();
        }
    }

    fn pause_music(&mut self) {
        if let Some(sink) = &self.music_sink {
            sink.pause();
        }
    }

    fn unpause_music(&mut self) {
        if let Some(sink) = &self.music_sink {
            sink.play();
        }
    }

    fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.music_sink {
            sink.set_volume(self.music_volume);
        }
    }

    fn shutdown(&mut self) {
        self.stop_music();
        for channel in self.channels.iter() {
            channel.sink.stop();
        }
        for (_, sink) in self.default_sinks.drain() {
            sink.stop();
        }
        self.channels.clear();
        self.clips.clear();
        self.music = None;
        log::info!("Rodio audio backend shut down");
    }
}
