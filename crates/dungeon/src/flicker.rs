//! Torch light flicker
//!
//! Each tick either undoes the previous change (sign flag set) or draws a
//! fresh positive change, then flips the flag. Intensity therefore wanders
//! inside `baseline ± max_delta` and never drifts.

use crate::random::RandomSource;

/// Sign flag and current intensity change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlickerState {
    positive: bool,
    delta: f32,
    max_delta: f32,
}

impl FlickerState {
    /// Start flickering with an initial change drawn in `[0, max_delta)`
    pub fn new(max_delta: f32, rng: &mut dyn RandomSource) -> Self {
        Self {
            positive: true,
            delta: rng.next_range(0.0, max_delta),
            max_delta,
        }
    }

    /// Advance one tick and return the change to add to each torch light
    pub fn step(&mut self, rng: &mut dyn RandomSource) -> f32 {
        if self.positive {
            self.delta = -self.delta;
        } else {
            self.delta = rng.next_range(0.0, self.max_delta);
        }
        self.positive = !self.positive;
        self.delta
    }

    /// Change applied by the latest tick
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Largest change per tick
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }
}
