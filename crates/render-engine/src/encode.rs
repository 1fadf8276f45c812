//! Encoder constraint derivation.
//!
//! The byte budget and the oracle's duration estimate determine the
//! bitrate envelope handed to the engine: a safety-margin target with
//! explicit min/max bracketing, plus a VP9 quality factor.

use clipstick_edit_model::OutputConstraints;
use serde::{Deserialize, Serialize};

/// Fraction of the theoretical maximum bitrate actually targeted,
/// leaving headroom for container overhead and rate-control drift.
pub const BITRATE_SAFETY_FACTOR: f64 = 0.72;

/// Lower bound on the minrate relative to the target.
const MIN_RATE_RATIO: f64 = 0.6;

/// Floor on the target bitrate, kbps. Below this VP9 output is mush.
const TARGET_FLOOR_KBPS: u32 = 100;

/// VP9 constant-quality factor.
const VP9_CRF: u32 = 30;

/// The bitrate envelope and quality factor for one export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConstraints {
    /// Target average bitrate in kbps.
    pub target_kbps: u32,

    /// Rate-control lower bound in kbps.
    pub min_kbps: u32,

    /// Rate-control upper bound in kbps.
    pub max_kbps: u32,

    /// Rate-control buffer size in kbps.
    pub bufsize_kbps: u32,

    /// VP9 quality factor.
    pub crf: u32,
}

impl EncoderConstraints {
    /// Derive the envelope from the output policy and the estimated
    /// clip duration (from the duration oracle).
    pub fn derive(constraints: &OutputConstraints, estimated_secs: f64) -> Self {
        let secs = estimated_secs.max(0.1);
        let raw_kbps = constraints.max_bytes as f64 * 8.0 / secs / 1000.0;
        let target_kbps = ((raw_kbps * BITRATE_SAFETY_FACTOR).round() as u32).max(TARGET_FLOOR_KBPS);

        Self {
            target_kbps,
            min_kbps: (target_kbps as f64 * MIN_RATE_RATIO).round() as u32,
            max_kbps: target_kbps,
            bufsize_kbps: target_kbps * 2,
            crf: VP9_CRF,
        }
    }

    /// Engine-side rate-control arguments.
    pub fn to_ffmpeg_args(&self) -> Vec<String> {
        vec![
            "-b:v".to_string(),
            format!("{}k", self.target_kbps),
            "-minrate".to_string(),
            format!("{}k", self.min_kbps),
            "-maxrate".to_string(),
            format!("{}k", self.max_kbps),
            "-bufsize".to_string(),
            format!("{}k", self.bufsize_kbps),
            "-crf".to_string(),
            self.crf.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_at_three_seconds() {
        // 256 KiB over 3s: raw ≈ 699 kbps, target ≈ 503 kbps.
        let envelope = EncoderConstraints::derive(&OutputConstraints::default(), 3.0);
        assert_eq!(envelope.target_kbps, 503);
        assert_eq!(envelope.min_kbps, 302);
        assert_eq!(envelope.max_kbps, 503);
        assert_eq!(envelope.bufsize_kbps, 1006);
        assert_eq!(envelope.crf, 30);
    }

    #[test]
    fn test_shorter_clips_get_higher_bitrate() {
        let long = EncoderConstraints::derive(&OutputConstraints::default(), 3.0);
        let short = EncoderConstraints::derive(&OutputConstraints::default(), 1.0);
        assert!(short.target_kbps > long.target_kbps);
    }

    #[test]
    fn test_target_floor_applies() {
        let mut policy = OutputConstraints::default();
        policy.max_bytes = 1024; // absurdly small budget
        let envelope = EncoderConstraints::derive(&policy, 3.0);
        assert_eq!(envelope.target_kbps, 100);
    }

    #[test]
    fn test_ffmpeg_args_shape() {
        let envelope = EncoderConstraints::derive(&OutputConstraints::default(), 3.0);
        let args = envelope.to_ffmpeg_args();
        assert_eq!(args[0], "-b:v");
        assert_eq!(args[1], "503k");
        assert_eq!(args.len(), 10);
    }
}
