//! Audio backend implementations
//!
//! Platform-independent abstraction over audio playback libraries. The
//! headless engine keeps its own playback clock from [`ClipInfo::length`];
//! backends only have to produce (or skip) the actual output.

pub mod silent;
#[cfg(feature = "rodio-audio")]
pub mod rodio_backend;

use std::path::Path;
use std::time::Duration;

use crate::audio::AudioError;

pub use silent::SilentBackend;

/// Handle to a voice started by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceHandle(pub u32);

/// Metadata of a loaded clip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipInfo {
    /// Playback length of one pass through the clip
    pub length: Duration,
}

/// Audio backend trait for platform abstraction
///
/// Not `Send + Sync`: the engine and all its callbacks run on one thread.
pub trait AudioBackend {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Open a clip and report its length
    fn load_clip(&mut self, path: &Path) -> Result<ClipInfo, AudioError>;

    /// Start a voice playing `path`
    fn play(&mut self, path: &Path, volume: f32, looping: bool) -> Result<VoiceHandle, AudioError>;

    /// Change the volume of a playing voice
    fn set_volume(&mut self, voice: VoiceHandle, volume: f32) -> Result<(), AudioError>;

    /// Stop a voice
    fn stop(&mut self, voice: VoiceHandle) -> Result<(), AudioError>;

    /// Stop all playing voices
    fn stop_all(&mut self);
}
