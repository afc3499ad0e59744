//! Particle system descriptions

use std::path::PathBuf;

use crate::foundation::math::{Bounds, Vec3};
use crate::scene::handles::MeshId;

/// How particles are blended into the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Alpha blending
    Standard,
    /// Additive blending
    OneOne,
}

/// Everything the engine needs to build a particle system
///
/// Particles spawn inside `emit_box`, which is expressed relative to the
/// emitter mesh position.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSystemDesc {
    /// System name
    pub name: String,
    /// Maximum number of live particles
    pub capacity: usize,
    /// Particle texture, relative to the asset root
    pub texture: PathBuf,
    /// Mesh the particles are emitted from
    pub emitter: MeshId,
    /// Blend mode
    pub blend_mode: BlendMode,
    /// Particle size range
    pub min_size: f32,
    /// Particle size range
    pub max_size: f32,
    /// Particle lifetime range in seconds
    pub min_lifetime: f32,
    /// Particle lifetime range in seconds
    pub max_lifetime: f32,
    /// Spawn box relative to the emitter
    pub emit_box: Bounds,
    /// Particles emitted per second
    pub emit_rate: f32,
}

impl ParticleSystemDesc {
    /// Create a description with unit size/lifetime and a point emit box
    pub fn new(name: impl Into<String>, capacity: usize, texture: impl Into<PathBuf>, emitter: MeshId) -> Self {
        Self {
            name: name.into(),
            capacity,
            texture: texture.into(),
            emitter,
            blend_mode: BlendMode::Standard,
            min_size: 1.0,
            max_size: 1.0,
            min_lifetime: 1.0,
            max_lifetime: 1.0,
            emit_box: Bounds::new(Vec3::zeros(), Vec3::zeros()),
            emit_rate: 10.0,
        }
    }

    /// Set blend mode
    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    /// Set particle size range
    pub fn with_size(mut self, min: f32, max: f32) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    /// Set particle lifetime range (seconds)
    pub fn with_lifetime(mut self, min: f32, max: f32) -> Self {
        self.min_lifetime = min;
        self.max_lifetime = max;
        self
    }

    /// Set spawn box relative to the emitter
    pub fn with_emit_box(mut self, min: Vec3, max: Vec3) -> Self {
        self.emit_box = Bounds::new(min, max);
        self
    }

    /// Set emission rate (particles per second)
    pub fn with_emit_rate(mut self, rate: f32) -> Self {
        self.emit_rate = rate;
        self
    }

    /// Identical configuration bound to another emitter
    pub fn clone_for(&self, name: impl Into<String>, emitter: MeshId) -> Self {
        Self {
            name: name.into(),
            emitter,
            ..self.clone()
        }
    }

    /// Check the ranges are usable
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err(format!("particle system '{}' has zero capacity", self.name));
        }
        if !(0.0..=self.max_size).contains(&self.min_size) {
            return Err(format!("particle system '{}' has an invalid size range", self.name));
        }
        if !(0.0..=self.max_lifetime).contains(&self.min_lifetime) {
            return Err(format!("particle system '{}' has an invalid lifetime range", self.name));
        }
        if !self.emit_box.is_valid() {
            return Err(format!("particle system '{}' has an inverted emit box", self.name));
        }
        if self.emit_rate < 0.0 {
            return Err(format!("particle system '{}' has a negative emit rate", self.name));
        }
        Ok(())
    }
}
