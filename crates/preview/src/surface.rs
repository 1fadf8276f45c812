//! The playback surface abstraction.

/// A seekable, rate-controllable video surface the scheduler drives.
///
/// Positions are in source-media seconds. Implementations are expected
/// to keep advancing `position_secs` on their own while playing; the
/// scheduler only corrects the position at phase boundaries and steps
/// it manually during a reverse pass.
pub trait PlaybackSurface {
    /// Current playback position in source seconds.
    fn position_secs(&self) -> f64;

    /// Whether playback is currently paused.
    fn is_paused(&self) -> bool;

    /// Whether the surface has media loaded and can seek.
    fn is_ready(&self) -> bool;

    /// Seek to a position in source seconds.
    fn set_position(&mut self, secs: f64);

    /// Set the forward playback rate.
    fn set_rate(&mut self, rate: f64);

    /// Resume playback.
    fn play(&mut self);

    /// Pause playback.
    fn pause(&mut self);
}

/// An in-memory surface advancing deterministically under test control.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedSurface {
    position_secs: f64,
    rate: f64,
    paused: bool,
    ready: bool,
    duration_secs: f64,
}

impl SimulatedSurface {
    pub fn new(duration_secs: f64) -> Self {
        Self {
            position_secs: 0.0,
            rate: 1.0,
            paused: false,
            ready: true,
            duration_secs,
        }
    }

    /// Advance wall time by `dt_secs`, moving the playhead at the
    /// current rate while playing.
    pub fn advance(&mut self, dt_secs: f64) {
        if self.ready && !self.paused {
            self.position_secs =
                (self.position_secs + dt_secs * self.rate).clamp(0.0, self.duration_secs);
        }
    }

    /// Current playback rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Mark the surface as still loading.
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }
}

impl PlaybackSurface for SimulatedSurface {
    fn position_secs(&self) -> f64 {
        self.position_secs
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn set_position(&mut self, secs: f64) {
        self.position_secs = secs.clamp(0.0, self.duration_secs);
    }

    fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    fn play(&mut self) {
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }
}
