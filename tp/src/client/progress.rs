//! Simulated generation progress
//!
//! Cosmetic only: the bar creeps toward 90 while the real request runs and
//! jumps to 100 when it lands.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

/// Status lines shown while generating, in order
pub const STATUS_MESSAGES: [&str; 5] = [
    "Researching your destination...",
    "Finding the best activities...",
    "Scheduling your perfect days...",
    "Checking weather patterns...",
    "Finalizing your itinerary...",
];

/// Progress value at which the status advances past index i
const STATUS_THRESHOLDS: [f64; 4] = [20.0, 40.0, 60.0, 80.0];

/// Ticker period
pub const TICK_INTERVAL: Duration = Duration::from_millis(150);

/// Simulated progress never passes this before completion
pub const PROGRESS_CAP: f64 = 90.0;

pub const MIN_INCREMENT: f64 = 0.5;
pub const MAX_INCREMENT: f64 = 2.0;

/// Point-in-time view for a renderer
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub progress: f64,
    pub status: &'static str,
}

impl ProgressSnapshot {
    /// Rounded percentage for display
    pub fn percent(&self) -> u8 {
        self.progress.round().clamp(0.0, 100.0) as u8
    }
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self {
            progress: 0.0,
            status: STATUS_MESSAGES[0],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressSimulator {
    progress: f64,
    status_index: usize,
}

impl ProgressSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn status(&self) -> &'static str {
        STATUS_MESSAGES[self.status_index]
    }

    /// Apply one tick with a fixed increment
    ///
    /// The status advances at most one step per tick.
    pub fn advance(&mut self, increment: f64) -> ProgressSnapshot {
        self.progress = (self.progress + increment).min(PROGRESS_CAP);

        if let Some(threshold) = STATUS_THRESHOLDS.get(self.status_index)
            && self.progress >= *threshold
        {
            self.status_index += 1;
            debug!(
                progress = self.progress,
                status = self.status(),
                "ProgressSimulator::advance: status advanced"
            );
        }
        self.snapshot()
    }

    /// Apply one tick with a random increment in [0.5, 2.0]
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> ProgressSnapshot {
        let increment = rng.random_range(MIN_INCREMENT..=MAX_INCREMENT);
        self.advance(increment)
    }

    /// Jump to 100 once the real result is in
    pub fn complete(&mut self) -> ProgressSnapshot {
        debug!("ProgressSimulator::complete: called");
        self.progress = 100.0;
        self.snapshot()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            progress: self.progress,
            status: self.status(),
        }
    }
}
