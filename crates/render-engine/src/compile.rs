//! The graph compiler: [`EditSpec`] → [`TransformGraph`].
//!
//! Pure and deterministic; never touches media bytes and never
//! re-validates; specs must pass [`EditSpec::validate`] before they get
//! here. Stage order is fixed: trim → speed → boomerang → crop → scale.

use clipstick_edit_model::EditSpec;
use clipstick_timeline_core::TimeRemap;

use crate::graph::{Pad, RemapExpr, Stage, StageOp, TransformGraph};

/// Sub-streams shorter than this are omitted from the speed split.
pub const PART_EPSILON_SECS: f64 = 0.01;

/// Compile the spec into an ordered, pad-wired transform graph.
pub fn compile(spec: &EditSpec) -> TransformGraph {
    let fps = spec.constraints.target_fps;
    let mut stages: Vec<Stage> = Vec::new();

    // 1. Trim: isolate the selection, reset its time origin, force the
    //    target frame rate so downstream splice math is frame-aligned.
    stages.push(Stage {
        op: StageOp::Trim {
            start_secs: spec.trim.start_secs,
            end_secs: Some(spec.trim.end_secs),
            fps: Some(fps),
        },
        inputs: vec![Pad::new("0:v")],
        outputs: vec![Pad::new("base_trimmed")],
    });
    let mut current = Pad::new("base_trimmed");

    // 2. Speed: split into head / remapped middle / tail, omitting empty
    //    sub-streams, then concat back and re-assert the frame rate.
    if let Some(remap) = TimeRemap::from_spec(spec) {
        current = push_speed_stages(&mut stages, current, &remap, spec.trim.duration_secs(), fps);
    }

    // 3. Boomerang: forward copy + reversed copy with the apex frames
    //    dropped from the head of the reversed half.
    if spec.boomerang.enabled {
        stages.push(Stage {
            op: StageOp::Split { count: 2 },
            inputs: vec![current],
            outputs: vec![Pad::new("fwd"), Pad::new("rev_in")],
        });
        stages.push(Stage {
            op: StageOp::Reverse {
                drop_frames: spec.boomerang.frame_trim,
            },
            inputs: vec![Pad::new("rev_in")],
            outputs: vec![Pad::new("rev_out")],
        });
        stages.push(Stage {
            op: StageOp::Concat {
                parts: 2,
                fps: None,
            },
            inputs: vec![Pad::new("fwd"), Pad::new("rev_out")],
            outputs: vec![Pad::new("looped")],
        });
        current = Pad::new("looped");
    }

    // 4. Crop.
    stages.push(Stage {
        op: StageOp::Crop {
            x: spec.crop.x,
            y: spec.crop.y,
            width: spec.crop.width,
            height: spec.crop.height,
        },
        inputs: vec![current],
        outputs: vec![Pad::new("cropped")],
    });

    // 5. Scale.
    stages.push(Stage {
        op: StageOp::Scale {
            max_edge: spec.constraints.max_edge_pixels,
        },
        inputs: vec![Pad::new("cropped")],
        outputs: vec![Pad::new("out")],
    });

    TransformGraph::new(stages, Pad::new("out"))
}

/// Emit the split/remap/concat stages for the speed segment and return
/// the pad carrying the speed-adjusted stream.
fn push_speed_stages(
    stages: &mut Vec<Stage>,
    current: Pad,
    remap: &TimeRemap,
    trimmed_secs: f64,
    fps: u32,
) -> Pad {
    let has_head = remap.range_start_secs > PART_EPSILON_SECS;
    let has_tail = remap.range_end_secs < trimmed_secs - PART_EPSILON_SECS;
    let part_count = 1 + usize::from(has_head) + usize::from(has_tail);

    // Only materialize the split when more than one sub-stream survives.
    let mid_source = if part_count > 1 {
        let mut split_outputs = Vec::with_capacity(part_count);
        if has_head {
            split_outputs.push(Pad::new("pre_in"));
        }
        split_outputs.push(Pad::new("mid_in"));
        if has_tail {
            split_outputs.push(Pad::new("post_in"));
        }
        stages.push(Stage {
            op: StageOp::Split { count: part_count },
            inputs: vec![current],
            outputs: split_outputs,
        });
        Pad::new("mid_in")
    } else {
        current
    };

    let mut parts: Vec<Pad> = Vec::with_capacity(part_count);

    if has_head {
        stages.push(Stage {
            op: StageOp::Trim {
                start_secs: 0.0,
                end_secs: Some(remap.range_start_secs),
                fps: None,
            },
            inputs: vec![Pad::new("pre_in")],
            outputs: vec![Pad::new("speed_a")],
        });
        parts.push(Pad::new("speed_a"));
    }

    stages.push(Stage {
        op: StageOp::Trim {
            start_secs: remap.range_start_secs,
            end_secs: Some(remap.range_end_secs),
            fps: None,
        },
        inputs: vec![mid_source],
        outputs: vec![Pad::new("mid_trimmed")],
    });

    if remap.is_unity() {
        // Effectively no rate change: the isolated segment passes through.
        parts.push(Pad::new("mid_trimmed"));
    } else {
        let expr = if remap.fade {
            RemapExpr::Ramp {
                slope: remap.ramp_slope(),
            }
        } else {
            RemapExpr::Constant {
                factor: 1.0 / remap.target_rate,
            }
        };
        stages.push(Stage {
            op: StageOp::TimeRemap { expr },
            inputs: vec![Pad::new("mid_trimmed")],
            outputs: vec![Pad::new("speed_b")],
        });
        parts.push(Pad::new("speed_b"));
    }

    if has_tail {
        stages.push(Stage {
            op: StageOp::Trim {
                start_secs: remap.range_end_secs,
                end_secs: None,
                fps: None,
            },
            inputs: vec![Pad::new("post_in")],
            outputs: vec![Pad::new("speed_c")],
        });
        parts.push(Pad::new("speed_c"));
    }

    stages.push(Stage {
        op: StageOp::Concat {
            parts: parts.len(),
            fps: Some(fps),
        },
        inputs: parts,
        outputs: vec![Pad::new("speed_out")],
    });

    Pad::new("speed_out")
}
