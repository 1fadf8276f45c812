//! The compiled transform graph must imply the same output duration the
//! duration oracle predicts, for any valid edit.
//!
//! The oracle rounds to two decimals for display; the graph walk does
//! not, so comparisons allow a half-cent of rounding slack.

use clipstick_edit_model::{
    Boomerang, EditSpec, OutputConstraints, SpeedRange, SpeedSegment, TrimRange,
};
use clipstick_render_engine::compile;
use clipstick_timeline_core::compute_output_duration;
use proptest::prelude::*;

const ROUNDING_SLACK: f64 = 0.006;

fn make_spec(
    trim: (f64, f64),
    speed: Option<(f64, bool, f64, f64)>,
    boomerang: bool,
) -> EditSpec {
    let mut spec = EditSpec::for_source(60.0, OutputConstraints::default());
    spec.trim = TrimRange::new(trim.0, trim.1);
    if let Some((value, fade, range_start, range_end)) = speed {
        spec.speed = SpeedSegment {
            enabled: true,
            value,
            fade,
            range: SpeedRange {
                start_secs: range_start,
                end_secs: range_end,
            },
        };
    }
    if boomerang {
        spec.boomerang = Boomerang {
            enabled: true,
            frame_trim: 1,
        };
    }
    spec
}

fn assert_agreement(spec: &EditSpec) {
    spec.validate().expect("well-formed edit");
    let oracle = compute_output_duration(spec);
    let implied = compile(spec).implied_duration_secs();
    assert!(
        (oracle - implied).abs() <= ROUNDING_SLACK,
        "oracle {oracle} vs graph {implied} for {spec:?}"
    );
}

#[test]
fn test_agreement_plain_trim() {
    assert_agreement(&make_spec((0.0, 3.0), None, false));
    assert_agreement(&make_spec((1.5, 4.0), None, false));
}

#[test]
fn test_agreement_constant_speed_full_range() {
    assert_agreement(&make_spec((0.0, 2.0), Some((2.0, false, 0.0, 2.0)), false));
    assert_agreement(&make_spec((0.0, 1.0), Some((0.5, false, 0.0, 1.0)), false));
}

#[test]
fn test_agreement_ramp_full_range() {
    assert_agreement(&make_spec((0.0, 2.0), Some((2.0, true, 0.0, 2.0)), false));
    assert_agreement(&make_spec((0.0, 2.5), Some((4.0, true, 0.0, 2.5)), false));
}

#[test]
fn test_agreement_partial_range_with_boomerang() {
    assert_agreement(&make_spec((0.0, 1.4), Some((3.0, false, 0.4, 1.0)), true));
    assert_agreement(&make_spec((0.5, 1.9), Some((2.0, true, 0.2, 1.2)), true));
}

#[test]
fn test_agreement_unity_rate_all_modes() {
    assert_agreement(&make_spec((0.0, 2.0), Some((1.0, false, 0.0, 2.0)), false));
    assert_agreement(&make_spec((0.0, 2.0), Some((1.0, true, 0.5, 1.5)), true));
}

proptest! {
    // Speed ranges are generated a safe margin away from the sub-stream
    // omission threshold so a dropped hairline head or tail cannot
    // masquerade as a formula mismatch.
    #[test]
    fn prop_graph_duration_matches_oracle(
        trim_start in 0.0f64..5.0,
        trim_len in 0.5f64..8.0,
        value in 0.25f64..6.0,
        fade in any::<bool>(),
        head_frac in 0.0f64..0.4,
        tail_frac in 0.0f64..0.4,
        boomerang in any::<bool>(),
    ) {
        let head = if head_frac < 0.05 { 0.0 } else { trim_len * head_frac };
        let tail = if tail_frac < 0.05 { 0.0 } else { trim_len * tail_frac };
        let spec = make_spec(
            (trim_start, trim_start + trim_len),
            Some((value, fade, head, trim_len - tail)),
            boomerang,
        );

        spec.validate().expect("generated edit is well-formed");
        let oracle = compute_output_duration(&spec);
        let implied = compile(&spec).implied_duration_secs();
        prop_assert!((oracle - implied).abs() <= ROUNDING_SLACK);
    }

    #[test]
    fn prop_graph_duration_matches_oracle_without_speed(
        trim_start in 0.0f64..10.0,
        trim_len in 0.1f64..10.0,
        boomerang in any::<bool>(),
    ) {
        let spec = make_spec((trim_start, trim_start + trim_len), None, boomerang);
        let oracle = compute_output_duration(&spec);
        let implied = compile(&spec).implied_duration_secs();
        prop_assert!((oracle - implied).abs() <= ROUNDING_SLACK);
    }
}
