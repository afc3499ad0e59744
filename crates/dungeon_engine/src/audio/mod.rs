//! Audio types shared by the engine interface and its backends

pub mod spatial;
pub mod backend;

use std::path::PathBuf;
use thiserror::Error;

pub use spatial::{SpatialAudio, SpatialConfig};

/// Audio errors
#[derive(Error, Debug)]
pub enum AudioError {
    /// The handle does not refer to a live voice
    #[error("invalid audio handle")]
    InvalidHandle,

    /// The clip could not be opened or decoded
    #[error("failed to load audio clip: {0}")]
    LoadFailed(String),

    /// Playback could not start
    #[error("playback failed: {0}")]
    PlaybackFailed(String),
}

/// Playback options for a sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundOptions {
    /// Restart from the beginning when the clip ends
    pub looping: bool,
    /// Start playing as soon as the sound is created
    pub autoplay: bool,
    /// Attenuate by distance to the listener
    pub spatial: bool,
    /// Distance at which a spatial sound becomes silent
    pub max_distance: f32,
    /// Base volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for SoundOptions {
    fn default() -> Self {
        Self {
            looping: false,
            autoplay: false,
            spatial: false,
            max_distance: 100.0,
            volume: 1.0,
        }
    }
}

/// Sound creation request
#[derive(Debug, Clone, PartialEq)]
pub struct SoundDesc {
    /// Sound name
    pub name: String,
    /// Clip path, relative to the asset root
    pub path: PathBuf,
    /// Playback options
    pub options: SoundOptions,
}

impl SoundDesc {
    /// One-shot, non-spatial sound at full volume
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            options: SoundOptions::default(),
        }
    }

    /// Replace playback options
    pub fn with_options(mut self, options: SoundOptions) -> Self {
        self.options = options;
        self
    }
}
