//! Backend that produces no output
//!
//! Every clip reports the same length, which keeps headless runs and tests
//! deterministic and independent of the asset files being present.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use super::{AudioBackend, ClipInfo, VoiceHandle};
use crate::audio::AudioError;

/// Silent audio backend
#[derive(Debug)]
pub struct SilentBackend {
    clip_length: Duration,
    voices: HashSet<VoiceHandle>,
    next_id: u32,
}

impl SilentBackend {
    /// Default length reported for every clip
    pub const DEFAULT_CLIP_LENGTH: Duration = Duration::from_millis(400);

    /// Create a backend reporting [`Self::DEFAULT_CLIP_LENGTH`] for every clip
    pub fn new() -> Self {
        Self::with_clip_length(Self::DEFAULT_CLIP_LENGTH)
    }

    /// Create a backend reporting `clip_length` for every clip
    pub fn with_clip_length(clip_length: Duration) -> Self {
        Self {
            clip_length,
            voices: HashSet::new(),
            next_id: 0,
        }
    }

    /// Number of voices started and not yet stopped
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }
}

impl Default for SilentBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for SilentBackend {
    fn name(&self) -> &'static str {
        "silent"
    }

    fn load_clip(&mut self, _path: &Path) -> Result<ClipInfo, AudioError> {
        Ok(ClipInfo { length: self.clip_length })
    }

    fn play(&mut self, _path: &Path, _volume: f32, _looping: bool) -> Result<VoiceHandle, AudioError> {
        let handle = VoiceHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.voices.insert(handle);
        Ok(handle)
    }

    fn set_volume(&mut self, voice: VoiceHandle, _volume: f32) -> Result<(), AudioError> {
        if self.voices.contains(&voice) {
            Ok(())
        } else {
            Err(AudioError::InvalidHandle)
        }
    }

    fn stop(&mut self, voice: VoiceHandle) -> Result<(), AudioError> {
        if self.voices.remove(&voice) {
            Ok(())
        } else {
            Err(AudioError::InvalidHandle)
        }
    }

    fn stop_all(&mut self) {
        self.voices.clear();
    }
}
