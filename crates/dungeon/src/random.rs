//! Random number sources
//!
//! Scene logic draws every random value through [`RandomSource`] so runs can
//! be replayed with a fixed seed or a scripted sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform values in `[0, 1)`
pub trait RandomSource {
    /// Next value in `[0, 1)`
    fn next_unit(&mut self) -> f32;

    /// Next value in `[min, max)`; returns `min` when the range is empty
    fn next_range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.next_unit() * (max - min) + min
    }
}

/// `StdRng`-backed source
#[derive(Debug, Clone)]
pub struct ThreadRandom {
    rng: StdRng,
}

impl ThreadRandom {
    /// Seed from the operating system
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Reproducible source
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Replays a fixed list of values, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Replay `values` in order; an empty list always yields `0.0`
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        Self { values: values.into(), cursor: 0 }
    }

    /// Always yield `value`
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
