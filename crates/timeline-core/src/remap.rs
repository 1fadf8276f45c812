//! The time-remap function.
//!
//! A speed segment maps a sub-interval `[r_start, r_end]` of the trimmed
//! timeline to output time. Two modes:
//!
//! - **Constant:** rate is the target factor `S` throughout; the segment
//!   contributes `(r_end - r_start) / S` of output time.
//! - **Ramp** (`fade`): rate climbs linearly from `1.0` at `r_start` to
//!   `S` at `r_end`. With `k = (S - 1) / range_dur` the instantaneous
//!   rate is `rate(t) = 1 + k·t`, and the output time for the whole
//!   segment is the integral
//!   `∫ dt / rate(t) = (range_dur / (S - 1)) · ln(S)`,
//!   which degenerates to `range_dur` as `S → 1`.
//!
//! The duration oracle uses the closed form; the preview scheduler uses
//! the differentiated form [`TimeRemap::rate_at`]. Both must agree with
//! the timestamp-rewrite expression the graph compiler emits.

use clipstick_edit_model::EditSpec;

/// Speed factors within this distance of 1.0 are treated as a no-op.
/// Keeps the ramp closed form away from its `S = 1` singularity and
/// matches the degenerate handling in the compiled timestamp expression.
pub const UNITY_RATE_EPSILON: f64 = 0.01;

/// A resolved speed segment on the trimmed timeline.
///
/// Construction via [`TimeRemap::from_spec`] clamps the range into the
/// trimmed interval and returns `None` when the segment has no effect,
/// so downstream code never handles degenerate ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRemap {
    /// Segment start on the trimmed timeline (0 = trim start), seconds.
    pub range_start_secs: f64,

    /// Segment end on the trimmed timeline, seconds.
    pub range_end_secs: f64,

    /// Target rate factor `S`.
    pub target_rate: f64,

    /// Ramp mode: interpolate rate from 1.0 to `S` across the segment.
    pub fade: bool,
}

impl TimeRemap {
    /// Resolve the spec's speed segment against its trimmed timeline.
    ///
    /// Returns `None` when speed is disabled or the clamped range is
    /// degenerate (`r_end ≤ r_start`); in both cases the identity
    /// mapping applies everywhere.
    pub fn from_spec(spec: &EditSpec) -> Option<Self> {
        if !spec.speed.enabled {
            return None;
        }

        let trimmed = spec.trim.duration_secs();
        let start = spec.speed.range.start_secs.clamp(0.0, trimmed);
        let end = spec.speed.range.end_secs.clamp(0.0, trimmed);

        if end <= start {
            return None;
        }

        Some(Self {
            range_start_secs: start,
            range_end_secs: end,
            target_rate: spec.speed.value,
            fade: spec.speed.fade,
        })
    }

    /// Length of the affected interval on the trimmed timeline.
    pub fn range_duration_secs(&self) -> f64 {
        self.range_end_secs - self.range_start_secs
    }

    /// Whether the target rate is close enough to 1.0 to be a no-op.
    pub fn is_unity(&self) -> bool {
        (self.target_rate - 1.0).abs() < UNITY_RATE_EPSILON
    }

    /// Ramp slope `k = (S - 1) / range_dur`. Zero for unity rate.
    pub fn ramp_slope(&self) -> f64 {
        if self.is_unity() {
            0.0
        } else {
            (self.target_rate - 1.0) / self.range_duration_secs()
        }
    }

    /// Output time contributed by the segment (closed form).
    pub fn segment_output_secs(&self) -> f64 {
        let range_dur = self.range_duration_secs();

        if self.is_unity() {
            return range_dur;
        }

        if self.fade {
            // ∫0^range_dur dt / (1 + k·t) = (range_dur / (S-1)) · ln(S)
            (range_dur / (self.target_rate - 1.0)) * self.target_rate.ln()
        } else {
            range_dur / self.target_rate
        }
    }

    /// Instantaneous playback rate at a position on the trimmed timeline.
    ///
    /// Identity (1.0) outside the segment. Inside, constant mode holds
    /// the target rate (an abrupt step at the boundary); ramp mode
    /// interpolates linearly from 1.0 to the target, so the rate is
    /// continuous at the segment entry.
    pub fn rate_at(&self, trimmed_pos_secs: f64) -> f64 {
        if trimmed_pos_secs < self.range_start_secs || trimmed_pos_secs > self.range_end_secs {
            return 1.0;
        }

        if self.fade {
            let progress = (trimmed_pos_secs - self.range_start_secs) / self.range_duration_secs();
            1.0 + (self.target_rate - 1.0) * progress
        } else {
            self.target_rate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipstick_edit_model::{EditSpec, OutputConstraints, SpeedRange, SpeedSegment, TrimRange};

    fn spec_with_speed(speed: SpeedSegment) -> EditSpec {
        let mut spec = EditSpec::for_source(10.0, OutputConstraints::default());
        spec.trim = TrimRange::new(1.0, 3.0);
        spec.speed = speed;
        spec
    }

    #[test]
    fn test_disabled_speed_resolves_to_none() {
        let spec = spec_with_speed(SpeedSegment::default());
        assert_eq!(TimeRemap::from_spec(&spec), None);
    }

    #[test]
    fn test_degenerate_range_resolves_to_none() {
        let spec = spec_with_speed(SpeedSegment {
            enabled: true,
            value: 2.0,
            fade: false,
            range: SpeedRange {
                start_secs: 1.5,
                end_secs: 1.5,
            },
        });
        assert_eq!(TimeRemap::from_spec(&spec), None);
    }

    #[test]
    fn test_range_clamped_to_trimmed_timeline() {
        let spec = spec_with_speed(SpeedSegment {
            enabled: true,
            value: 2.0,
            fade: false,
            range: SpeedRange {
                start_secs: -1.0,
                end_secs: 99.0,
            },
        });
        let remap = TimeRemap::from_spec(&spec).unwrap();
        assert!((remap.range_start_secs - 0.0).abs() < 1e-9);
        assert!((remap.range_end_secs - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_segment_duration() {
        let remap = TimeRemap {
            range_start_secs: 0.0,
            range_end_secs: 2.0,
            target_rate: 2.0,
            fade: false,
        };
        assert!((remap.segment_output_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ramp_segment_duration_closed_form() {
        let remap = TimeRemap {
            range_start_secs: 0.0,
            range_end_secs: 2.0,
            target_rate: 2.0,
            fade: true,
        };
        // (2 / 1) · ln 2
        let expected = 2.0 * std::f64::consts::LN_2;
        assert!((remap.segment_output_secs() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_unity_rate_is_identity_in_both_modes() {
        for fade in [false, true] {
            let remap = TimeRemap {
                range_start_secs: 0.5,
                range_end_secs: 1.7,
                target_rate: 1.0,
                fade,
            };
            assert!((remap.segment_output_secs() - 1.2).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rate_outside_range_is_identity() {
        let remap = TimeRemap {
            range_start_secs: 1.0,
            range_end_secs: 2.0,
            target_rate: 3.0,
            fade: false,
        };
        assert!((remap.rate_at(0.5) - 1.0).abs() < 1e-9);
        assert!((remap.rate_at(2.5) - 1.0).abs() < 1e-9);
        assert!((remap.rate_at(1.5) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ramp_rate_is_continuous_at_entry_and_hits_target() {
        let remap = TimeRemap {
            range_start_secs: 1.0,
            range_end_secs: 3.0,
            target_rate: 4.0,
            fade: true,
        };
        assert!((remap.rate_at(1.0) - 1.0).abs() < 1e-9);
        assert!((remap.rate_at(2.0) - 2.5).abs() < 1e-9);
        assert!((remap.rate_at(3.0) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_ramp_slope_matches_rate_derivative() {
        let remap = TimeRemap {
            range_start_secs: 0.0,
            range_end_secs: 2.0,
            target_rate: 3.0,
            fade: true,
        };
        let k = remap.ramp_slope();
        assert!((k - 1.0).abs() < 1e-9);
        assert!((remap.rate_at(0.5) - (1.0 + k * 0.5)).abs() < 1e-9);
    }
}
