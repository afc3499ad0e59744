//! Footstep sequencing
//!
//! Two alternating step clips plus an occasional variation. Which clip comes
//! next depends on which one finished last; the walking flag follows the
//! movement keys.

use std::ops::RangeInclusive;

use dungeon_engine::events::KeyCode;

/// One of the three footstep clips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Footstep {
    /// First step of the pair
    First,
    /// Second step of the pair
    Second,
    /// Occasional variation
    Variation,
}

impl Footstep {
    /// All clips in load order
    pub const ALL: [Self; 3] = [Self::First, Self::Second, Self::Variation];

    /// Position in [`Self::ALL`]
    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Variation => 2,
        }
    }
}

/// Alternation between the two regular steps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FootstepCycle {
    go_to_second: bool,
}

impl FootstepCycle {
    /// Pick the next clip for a roll in `[0, 1)`
    pub fn select(&self, roll: f32, variation_probability: f32) -> Footstep {
        if roll < variation_probability {
            Footstep::Variation
        } else if self.go_to_second {
            Footstep::Second
        } else {
            Footstep::First
        }
    }

    /// Record that `step` finished playing
    pub fn on_finished(&mut self, step: Footstep) {
        self.go_to_second = step == Footstep::First;
    }

    /// Whether the second step is due
    pub fn second_due(&self) -> bool {
        self.go_to_second
    }
}

/// Walking flag driven by movement keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementState {
    keys: RangeInclusive<KeyCode>,
    walking: bool,
}

impl MovementState {
    /// Treat codes in `keys` as movement
    pub fn new(keys: RangeInclusive<KeyCode>) -> Self {
        Self { keys, walking: false }
    }

    /// Handle a key press; returns whether the key is a movement key
    pub fn key_down(&mut self, code: KeyCode) -> bool {
        let movement = self.keys.contains(&code);
        if movement {
            self.walking = true;
        }
        movement
    }

    /// Handle a key release; returns whether the key is a movement key
    pub fn key_up(&mut self, code: KeyCode) -> bool {
        let movement = self.keys.contains(&code);
        if movement {
            self.walking = false;
        }
        movement
    }

    /// Whether a movement key is held
    pub fn is_walking(&self) -> bool {
        self.walking
    }
}
