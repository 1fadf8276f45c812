//! The edit specification: one immutable value per editing session.
//!
//! Operation order is fixed: trim → speed → boomerang → crop → scale.
//! The spec does not store derived values; duration and transform graphs
//! are computed from it on demand.

use serde::{Deserialize, Serialize};

/// The complete set of edit decisions for one sticker.
///
/// Consumers may assume a spec that passed [`EditSpec::validate`] upholds
/// every invariant documented on its fields. Invalid specs are a caller
/// bug and are rejected loudly, never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditSpec {
    /// Duration of the original media in seconds.
    pub source_duration_secs: f64,

    /// Selected sub-interval of the source timeline.
    pub trim: TrimRange,

    /// Optional variable-speed remapping of a sub-interval of the
    /// trimmed timeline.
    pub speed: SpeedSegment,

    /// Mirrored "boomerang" looping.
    pub boomerang: Boomerang,

    /// Pixel crop rectangle in source-frame coordinates, applied after
    /// trim/speed and before scaling.
    pub crop: CropRect,

    /// Fixed output policy. Not user-editable.
    pub constraints: OutputConstraints,
}

/// Contiguous sub-interval of the source timeline.
///
/// Invariant: `0 ≤ start_secs < end_secs ≤ source_duration_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimRange {
    pub start_secs: f64,
    pub end_secs: f64,
}

impl TrimRange {
    pub fn new(start_secs: f64, end_secs: f64) -> Self {
        Self {
            start_secs,
            end_secs,
        }
    }

    /// Length of the trimmed clip in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

/// Upper bound on the speed factor. Keeps downstream timestamp
/// arithmetic (and its fixed-precision serialization) well away from
/// degenerate near-zero scale factors.
pub const MAX_SPEED_FACTOR: f64 = 100.0;

/// Variable-speed remapping of a sub-interval of the trimmed timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedSegment {
    /// Whether speed remapping is active at all.
    pub enabled: bool,

    /// Target rate factor. >1 speeds up, <1 slows down.
    ///
    /// Invariant: `0 < value <= MAX_SPEED_FACTOR`.
    pub value: f64,

    /// Ramp mode: rate climbs linearly from 1.0 at the range start to
    /// `value` at the range end, instead of holding `value` throughout.
    pub fade: bool,

    /// Affected interval, relative to the trimmed timeline (0 = trim
    /// start).
    pub range: SpeedRange,
}

impl Default for SpeedSegment {
    fn default() -> Self {
        Self {
            enabled: false,
            value: 1.0,
            fade: false,
            range: SpeedRange {
                start_secs: 0.0,
                end_secs: 0.0,
            },
        }
    }
}

/// Interval on the trimmed timeline affected by speed remapping.
///
/// Invariant: `0 ≤ start_secs ≤ end_secs ≤ trim length`. A degenerate
/// range (`end ≤ start`) disables the effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedRange {
    pub start_secs: f64,
    pub end_secs: f64,
}

/// Mirrored playback: forward pass immediately followed by a reversed
/// pass, producing a seamless back-and-forth loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boomerang {
    /// Whether boomerang looping is active.
    pub enabled: bool,

    /// Frames dropped from the head of the reversed half to avoid a
    /// visibly doubled frame at the loop apex.
    pub frame_trim: u32,
}

impl Default for Boomerang {
    fn default() -> Self {
        Self {
            enabled: false,
            frame_trim: 1,
        }
    }
}

/// Pixel crop rectangle in source-frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for CropRect {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 512,
            height: 512,
        }
    }
}

/// Fixed output policy: frame rate, resolution, byte and duration caps.
///
/// Defaults follow the Telegram video sticker requirements: WebM/VP9,
/// silent, 512 px max edge, 30 fps, under 256 KiB and 3 seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputConstraints {
    /// Target output frame rate.
    pub target_fps: u32,

    /// Maximum edge length of the output frame in pixels.
    pub max_edge_pixels: u32,

    /// Maximum output file size in bytes.
    pub max_bytes: u64,

    /// Maximum output duration in seconds.
    pub max_duration_secs: f64,
}

impl Default for OutputConstraints {
    fn default() -> Self {
        Self {
            target_fps: 30,
            max_edge_pixels: 512,
            max_bytes: 256 * 1024,
            max_duration_secs: 3.0,
        }
    }
}

impl OutputConstraints {
    /// Duration of one output frame in seconds.
    pub fn frame_duration_secs(&self) -> f64 {
        1.0 / self.target_fps.max(1) as f64
    }
}

/// A spec field violating its declared bounds.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpecError {
    #[error("source duration must be non-negative, got {0}")]
    NegativeSourceDuration(f64),

    #[error("trim range [{start}, {end}] is invalid for source of {source_secs}s")]
    InvalidTrim {
        start: f64,
        end: f64,
        source_secs: f64,
    },

    #[error("speed value must be positive, got {0}")]
    NonPositiveSpeed(f64),

    #[error("speed value {0} exceeds the maximum of 100")]
    ExcessiveSpeed(f64),

    #[error("speed range [{start}, {end}] is outside the trimmed timeline of {trimmed}s")]
    SpeedRangeOutOfBounds {
        start: f64,
        end: f64,
        trimmed: f64,
    },

    #[error("crop rectangle has zero area ({width}x{height})")]
    EmptyCrop { width: u32, height: u32 },
}

impl EditSpec {
    /// Create a spec with default edit state for a freshly probed source.
    ///
    /// The initial trim selects the head of the clip, capped at the
    /// policy's maximum duration.
    pub fn for_source(source_duration_secs: f64, constraints: OutputConstraints) -> Self {
        let end = source_duration_secs.min(constraints.max_duration_secs);
        Self {
            source_duration_secs,
            trim: TrimRange::new(0.0, end),
            speed: SpeedSegment::default(),
            boomerang: Boomerang::default(),
            crop: CropRect::default(),
            constraints,
        }
    }

    /// Check every declared invariant.
    ///
    /// Out-of-bounds values are reported, not clamped: a failing spec
    /// indicates a bug in the caller that produced it.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.source_duration_secs < 0.0 {
            return Err(SpecError::NegativeSourceDuration(self.source_duration_secs));
        }

        if self.trim.start_secs < 0.0
            || self.trim.start_secs >= self.trim.end_secs
            || self.trim.end_secs > self.source_duration_secs
        {
            return Err(SpecError::InvalidTrim {
                start: self.trim.start_secs,
                end: self.trim.end_secs,
                source_secs: self.source_duration_secs,
            });
        }

        if self.speed.enabled {
            if self.speed.value <= 0.0 {
                return Err(SpecError::NonPositiveSpeed(self.speed.value));
            }
            if self.speed.value > MAX_SPEED_FACTOR {
                return Err(SpecError::ExcessiveSpeed(self.speed.value));
            }

            let trimmed = self.trim.duration_secs();
            let range = &self.speed.range;
            if range.start_secs < 0.0
                || range.end_secs < range.start_secs
                || range.end_secs > trimmed
            {
                return Err(SpecError::SpeedRangeOutOfBounds {
                    start: range.start_secs,
                    end: range.end_secs,
                    trimmed,
                });
            }
        }

        if self.crop.width == 0 || self.crop.height == 0 {
            return Err(SpecError::EmptyCrop {
                width: self.crop.width,
                height: self.crop.height,
            });
        }

        Ok(())
    }
}
