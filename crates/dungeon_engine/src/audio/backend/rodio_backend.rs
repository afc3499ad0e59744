//! Rodio audio backend implementation
//!
//! Uses the Rodio library for cross-platform audio playback. Enabled with the
//! `rodio-audio` feature.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::{AudioBackend, ClipInfo, VoiceHandle};
use crate::audio::AudioError;

/// Length assumed for clips whose decoder cannot report a duration
const FALLBACK_CLIP_LENGTH: Duration = Duration::from_millis(500);

/// Rodio-based audio backend
pub struct RodioBackend {
    /// Audio output stream (must be kept alive)
    _output_stream: OutputStream,
    /// Output stream handle for creating sinks
    stream_handle: OutputStreamHandle,
    /// Active sound sinks
    sinks: HashMap<VoiceHandle, Sink>,
    next_id: u32,
}

impl RodioBackend {
    /// Open the default output device
    pub fn new() -> Result<Self, AudioError> {
        let (output_stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to open output device: {e}")))?;
        Ok(Self {
            _output_stream: output_stream,
            stream_handle,
            sinks: HashMap::new(),
            next_id: 0,
        })
    }

    fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, AudioError> {
        let file = File::open(path)
            .map_err(|e| AudioError::LoadFailed(format!("{}: {e}", path.display())))?;
        Decoder::new(BufReader::new(file))
            .map_err(|e| AudioError::LoadFailed(format!("{}: {e}", path.display())))
    }
}

impl AudioBackend for RodioBackend {
    fn name(&self) -> &'static str {
        "rodio"
    }

    fn load_clip(&mut self, path: &Path) -> Result<ClipInfo, AudioError> {
        let source = Self::decode(path)?;
        Ok(ClipInfo {
            length: source.total_duration().unwrap_or(FALLBACK_CLIP_LENGTH),
        })
    }

    fn play(&mut self, path: &Path, volume: f32, looping: bool) -> Result<VoiceHandle, AudioError> {
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to create sink: {e}")))?;
        let source = Self::decode(path)?;
        if looping {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }
        sink.set_volume(volume);

        // Drop sinks that finished on their own
        self.sinks.retain(|_, sink| !sink.empty());

        let handle = VoiceHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.sinks.insert(handle, sink);
        Ok(handle)
    }

    fn set_volume(&mut self, voice: VoiceHandle, volume: f32) -> Result<(), AudioError> {
        let sink = self.sinks.get(&voice).ok_or(AudioError::InvalidHandle)?;
        sink.set_volume(volume);
        Ok(())
    }

    fn stop(&mut self, voice: VoiceHandle) -> Result<(), AudioError> {
        let sink = self.sinks.remove(&voice).ok_or(AudioError::InvalidHandle)?;
        sink.stop();
        Ok(())
    }

    fn stop_all(&mut self) {
        for (_, sink) in self.sinks.drain() {
            sink.stop();
        }
    }
}
