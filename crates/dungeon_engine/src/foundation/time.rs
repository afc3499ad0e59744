//! Time management utilities

use std::time::{Duration, Instant};

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the average FPS since timer creation
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

/// Fixed-period repeating timer driven by an external clock
///
/// The owner feeds elapsed time through [`IntervalTimer::advance`], which
/// reports how many whole periods completed. Leftover time carries over, so a
/// long frame fires several ticks rather than dropping them.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period: Duration,
    elapsed: Duration,
    fired: u64,
}

impl IntervalTimer {
    /// Create a timer firing every `period`
    ///
    /// A zero period is clamped to one millisecond.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            elapsed: Duration::ZERO,
            fired: 0,
        }
    }

    /// Advance by `dt` and return the number of ticks that became due
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.elapsed += dt;
        let mut ticks = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            ticks += 1;
        }
        self.fired += u64::from(ticks);
        ticks
    }

    /// Timer period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Total ticks fired since creation
    pub fn fired(&self) -> u64 {
        self.fired
    }
}
