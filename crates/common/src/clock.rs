//! Clock and timing utilities for the preview loop.
//!
//! The preview scheduler is driven by wall-clock tick timestamps. This
//! module anchors those timestamps to a monotonic epoch so that deltas
//! are immune to system clock adjustments.

use std::time::Instant;

/// A tick clock providing monotonic timestamps relative to a fixed epoch
/// (the moment the preview session started).
#[derive(Debug, Clone)]
pub struct TickClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string), for log correlation.
    epoch_wall: String,
}

impl TickClock {
    /// Create a new tick clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Seconds elapsed since the epoch. Suitable as a scheduler tick
    /// timestamp.
    pub fn now_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// The underlying epoch instant.
    pub fn epoch(&self) -> Instant {
        self.epoch
    }
}

/// Frame rate pacer for tick loops running off a plain sleep timer.
#[derive(Debug)]
pub struct FramePacer {
    target_interval_secs: f64,
    last_tick_secs: Option<f64>,
}

impl FramePacer {
    /// Create a pacer targeting the given Hz rate.
    pub fn new(target_hz: u32) -> Self {
        Self {
            target_interval_secs: 1.0 / target_hz.max(1) as f64,
            last_tick_secs: None,
        }
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, now_secs: f64) -> bool {
        match self.last_tick_secs {
            None => {
                self.last_tick_secs = Some(now_secs);
                true
            }
            Some(last) if now_secs >= last + self.target_interval_secs => {
                self.last_tick_secs = Some(now_secs);
                true
            }
            _ => false,
        }
    }

    /// Target interval in seconds.
    pub fn interval_secs(&self) -> f64 {
        self.target_interval_secs
    }
}
