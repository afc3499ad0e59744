//! Spatial audio attenuation
//!
//! Linear distance model: full volume inside the reference distance, fading
//! linearly to silence at the maximum distance.

use crate::foundation::math::Vec3;

/// Configuration for spatial audio
#[derive(Debug, Clone, Copy)]
pub struct SpatialConfig {
    /// Maximum audible distance from listener
    pub max_distance: f32,
    /// Reference distance for attenuation (no falloff)
    pub reference_distance: f32,
    /// Rolloff factor (1.0 reaches silence exactly at `max_distance`)
    pub rolloff: f32,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            max_distance: 100.0,
            reference_distance: 1.0,
            rolloff: 1.0,
        }
    }
}

impl SpatialConfig {
    /// Default model with a custom maximum distance
    pub fn with_max_distance(max_distance: f32) -> Self {
        Self {
            max_distance,
            ..Self::default()
        }
    }
}

/// Listener-relative attenuation
pub struct SpatialAudio {
    config: SpatialConfig,
    listener_position: Vec3,
}

impl SpatialAudio {
    /// Create a new spatial audio model
    pub fn new(config: SpatialConfig) -> Self {
        Self {
            config,
            listener_position: Vec3::zeros(),
        }
    }

    /// Set the listener (camera) position
    pub fn set_listener_position(&mut self, position: Vec3) {
        self.listener_position = position;
    }

    /// Calculate attenuation factor for a sound at given position
    pub fn calculate_attenuation(&self, sound_position: Vec3) -> f32 {
        let distance = (sound_position - self.listener_position).norm();

        // Beyond max distance, sound is inaudible
        if distance >= self.config.max_distance {
            return 0.0;
        }

        // Within reference distance, no attenuation
        if distance <= self.config.reference_distance {
            return 1.0;
        }

        let span = self.config.max_distance - self.config.reference_distance;
        let attenuation = 1.0 - self.config.rolloff * (distance - self.config.reference_distance) / span;
        attenuation.clamp(0.0, 1.0)
    }
}
