//! The preview scheduler.
//!
//! Drives a [`PlaybackSurface`] so a plain forward-playing surface
//! approximates the compiled output: the playback rate follows the
//! speed segment's instantaneous rate, the playhead loops inside the
//! trimmed selection, and boomerang is emulated by pausing at the
//! selection end and stepping the position backwards tick by tick,
//! since real surfaces cannot play in reverse.

use clipstick_edit_model::EditSpec;
use clipstick_timeline_core::TimeRemap;

use crate::surface::PlaybackSurface;

/// Slack allowed below the selection start before the playhead is
/// snapped back, absorbing seek inaccuracy on keyframe-sparse media.
pub const START_TOLERANCE_SECS: f64 = 0.05;

/// Floor for the applied playback rate. Surfaces reject rates near
/// zero, and a slower preview than this is indistinguishable from a
/// stall.
pub const MIN_PREVIEW_RATE: f64 = 0.1;

/// Which half of the loop the scheduler is producing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// Normal forward playback inside the trimmed selection.
    Forward,

    /// Boomerang only: manually stepping the position backwards toward
    /// the selection start while the surface is paused.
    Reversing,
}

/// Per-edit playback loop state.
///
/// Call [`tick`] at the interface frame cadence with a monotonic clock
/// reading; the scheduler derives the elapsed delta itself. A new
/// snapshot of the edit can be passed on every tick; the scheduler
/// holds no derived state, so slider changes take effect immediately.
///
/// [`tick`]: PreviewScheduler::tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewScheduler {
    phase: PlaybackPhase,
    last_tick_secs: Option<f64>,
}

impl Default for PreviewScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewScheduler {
    pub fn new() -> Self {
        Self {
            phase: PlaybackPhase::Forward,
            last_tick_secs: None,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// Restart the loop from the selection start at normal rate.
    pub fn reset<S: PlaybackSurface>(&mut self, spec: &EditSpec, surface: &mut S) {
        self.phase = PlaybackPhase::Forward;
        self.last_tick_secs = None;
        surface.set_rate(1.0);
        surface.set_position(spec.trim.start_secs);
        surface.play();
    }

    /// Advance the loop by one tick.
    pub fn tick<S: PlaybackSurface>(&mut self, spec: &EditSpec, surface: &mut S, now_secs: f64) {
        let delta_secs = match self.last_tick_secs {
            Some(prev) => (now_secs - prev).max(0.0),
            None => 0.0,
        };
        self.last_tick_secs = Some(now_secs);

        if !surface.is_ready() {
            return;
        }

        let trim = spec.trim;
        let remap = TimeRemap::from_spec(spec);
        let pos = surface.position_secs();

        // Instantaneous rate at the playhead. The remap works on the
        // trimmed timeline, so positions are rebased to the trim start.
        let rate = remap
            .map(|r| r.rate_at(pos - trim.start_secs))
            .unwrap_or(1.0)
            .max(MIN_PREVIEW_RATE);

        match self.phase {
            PlaybackPhase::Forward => {
                surface.set_rate(rate);

                if pos < trim.start_secs - START_TOLERANCE_SECS {
                    // Seek undershot or the trim handle moved past the
                    // playhead.
                    surface.set_position(trim.start_secs);
                    return;
                }

                if pos >= trim.end_secs {
                    if spec.boomerang.enabled {
                        // Loop apex: park the surface and jump back over
                        // the frames the reverse stage would drop.
                        let apex_jump_secs = spec.constraints.frame_duration_secs()
                            * f64::from(spec.boomerang.frame_trim + 1);
                        surface.pause();
                        surface.set_position((trim.end_secs - apex_jump_secs).max(trim.start_secs));
                        self.phase = PlaybackPhase::Reversing;
                        tracing::trace!(pos, "Selection end reached, reversing");
                    } else {
                        surface.set_position(trim.start_secs);
                        surface.play();
                        tracing::trace!(pos, "Selection end reached, looping");
                    }
                    return;
                }

                if surface.is_paused() {
                    // Edits can leave the surface parked mid-selection.
                    surface.play();
                }
            }
            PlaybackPhase::Reversing => {
                let next = surface.position_secs() - delta_secs * rate;
                if next <= trim.start_secs + START_TOLERANCE_SECS {
                    surface.set_position(trim.start_secs);
                    surface.set_rate(1.0);
                    self.phase = PlaybackPhase::Forward;
                    surface.play();
                    tracing::trace!("Reverse pass complete, resuming forward");
                } else {
                    surface.set_position(next);
                }
            }
        }
    }
}
