//! The duration oracle.
//!
//! Closed-form output duration for any valid [`EditSpec`], used for
//! live validity feedback in the interface and as the fail-fast check
//! before every export. The transform graph built by the compiler must
//! imply the same duration within floating-point tolerance.

use clipstick_edit_model::EditSpec;
use serde::{Deserialize, Serialize};

use crate::remap::TimeRemap;

/// Compute the effective output duration in seconds.
///
/// The trimmed interval splits into an unaffected head, the remapped
/// speed segment, and an unaffected tail; boomerang doubles the total.
/// The result is rounded to two decimal places for display and
/// comparison stability.
///
/// The boomerang `frame_trim` head-drop is a sub-frame rendering nuance
/// and is deliberately not reflected here: the estimate may overstate
/// the true duration by up to `frame_trim` frame periods.
pub fn compute_output_duration(spec: &EditSpec) -> f64 {
    let trimmed = spec.trim.duration_secs();

    let base = match TimeRemap::from_spec(spec) {
        None => trimmed,
        Some(remap) => {
            let head = remap.range_start_secs;
            let tail = trimmed - remap.range_end_secs;
            head + remap.segment_output_secs() + tail
        }
    };

    let total = if spec.boomerang.enabled {
        base * 2.0
    } else {
        base
    };

    (total * 100.0).round() / 100.0
}

/// Duration verdict for an edit, checked against the output policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationReport {
    /// Effective output duration in seconds.
    pub output_secs: f64,

    /// Policy limit in seconds.
    pub max_secs: f64,
}

impl DurationReport {
    /// Whether the edit fits inside the policy limit.
    pub fn within_limit(&self) -> bool {
        self.output_secs <= self.max_secs
    }
}

/// Compute the output duration and compare it against the spec's policy.
///
/// Called by the interface after every slider change and by the export
/// path before the transform engine is invoked.
pub fn check_duration(spec: &EditSpec) -> DurationReport {
    let report = DurationReport {
        output_secs: compute_output_duration(spec),
        max_secs: spec.constraints.max_duration_secs,
    };

    if !report.within_limit() {
        tracing::debug!(
            output_secs = report.output_secs,
            max_secs = report.max_secs,
            "Edit exceeds output duration limit"
        );
    }

    report
}
