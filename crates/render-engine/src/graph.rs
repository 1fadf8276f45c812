//! The transform graph: a typed, inspectable intermediate representation.
//!
//! A graph is an ordered list of stages, each reading and writing named
//! pads, forming a DAG with a single sink. It is constructed purely by
//! the compiler, never mutated afterwards, and serialized to the
//! engine's textual `filter_complex` syntax only at the boundary, so
//! the compiler stays testable without invoking ffmpeg.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A named stream connection point between stages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pad(pub String);

impl Pad {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The raw pad name without brackets.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pad {
    /// Pads render in the engine's bracketed link syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

/// Timestamp-rewrite expression applied to the speed segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RemapExpr {
    /// Constant-rate linear timestamp scaling. `factor` multiplies input
    /// timestamps, so a 2x speed-up uses `factor = 0.5`.
    Constant { factor: f64 },

    /// Linear speed ramp with slope `k = (S - 1) / range_dur`. Output
    /// time for input timestamp `T` is `(1/k)·ln(1 + k·T)`.
    Ramp { slope: f64 },
}

impl RemapExpr {
    /// The engine-side `setpts` expression for this remap.
    fn to_setpts(self) -> String {
        match self {
            RemapExpr::Constant { factor } => format!("setpts={factor:.6}*PTS"),
            RemapExpr::Ramp { slope } => {
                format!("setpts=(1/{slope:.6})*log(1+{slope:.6}*T)")
            }
        }
    }

    /// Output duration of a stream of `input_secs` after this remap.
    fn map_duration(self, input_secs: f64) -> f64 {
        match self {
            RemapExpr::Constant { factor } => input_secs * factor,
            RemapExpr::Ramp { slope } => (1.0 / slope) * (1.0 + slope * input_secs).ln(),
        }
    }
}

/// A single transform operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageOp {
    /// Isolate a time interval and reset the local time origin to zero.
    /// An open `end_secs` keeps everything from `start_secs` onward.
    /// When `fps` is set the frame rate is forced before trimming, to
    /// keep downstream timestamp arithmetic frame-aligned.
    Trim {
        start_secs: f64,
        end_secs: Option<f64>,
        fps: Option<u32>,
    },

    /// Rewrite timestamps of the speed segment.
    TimeRemap { expr: RemapExpr },

    /// Duplicate a stream into `count` identical copies.
    Split { count: usize },

    /// Reverse frame order, dropping the first `drop_frames` frames of
    /// the reversed stream to avoid a doubled frame at the loop apex.
    Reverse { drop_frames: u32 },

    /// Concatenate input streams in order. When `fps` is set the frame
    /// rate is re-asserted after the join to avoid frame-duration
    /// irregularities at the splice points.
    Concat { parts: usize, fps: Option<u32> },

    /// Fixed pixel crop rectangle.
    Crop { x: u32, y: u32, width: u32, height: u32 },

    /// Fit into a `max_edge` square preserving aspect ratio, never
    /// upscaling.
    Scale { max_edge: u32 },
}

impl StageOp {
    /// The engine-side filter chain for this operation.
    fn to_filter_chain(&self) -> String {
        match self {
            StageOp::Trim {
                start_secs,
                end_secs,
                fps,
            } => {
                let mut chain = String::new();
                if let Some(fps) = fps {
                    chain.push_str(&format!("fps={fps},format=yuv420p,"));
                }
                match end_secs {
                    Some(end) => chain.push_str(&format!(
                        "trim=start={start_secs:.3}:end={end:.3},setpts=PTS-STARTPTS"
                    )),
                    None => chain.push_str(&format!(
                        "trim=start={start_secs:.3},setpts=PTS-STARTPTS"
                    )),
                }
                chain
            }
            StageOp::TimeRemap { expr } => expr.to_setpts(),
            StageOp::Split { count } => format!("split={count}"),
            StageOp::Reverse { drop_frames } => {
                if *drop_frames > 0 {
                    format!("reverse,trim=start_frame={drop_frames},setpts=PTS-STARTPTS")
                } else {
                    "reverse,setpts=PTS-STARTPTS".to_string()
                }
            }
            StageOp::Concat { parts, fps } => {
                let mut chain = format!("concat=n={parts}:v=1:a=0:unsafe=1");
                if let Some(fps) = fps {
                    chain.push_str(&format!(",fps={fps}"));
                }
                chain
            }
            StageOp::Crop {
                x,
                y,
                width,
                height,
            } => format!("crop={width}:{height}:{x}:{y}"),
            StageOp::Scale { max_edge } => {
                // min() bounds keep small sources at their native size;
                // the quotes protect the inner commas from the graph
                // parser.
                format!(
                    "scale='min(iw,{max_edge})':'min(ih,{max_edge})':\
                     force_original_aspect_ratio=decrease"
                )
            }
        }
    }
}

/// One step of the graph: an operation wired between named pads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub op: StageOp,
    pub inputs: Vec<Pad>,
    pub outputs: Vec<Pad>,
}

/// The ordered stage list with a single sink pad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformGraph {
    stages: Vec<Stage>,
    sink: Pad,
}

impl TransformGraph {
    pub fn new(stages: Vec<Stage>, sink: Pad) -> Self {
        Self { stages, sink }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The pad the encoder maps from.
    pub fn sink(&self) -> &Pad {
        &self.sink
    }

    /// Serialize to the engine's `filter_complex` syntax.
    pub fn to_filter_complex(&self) -> String {
        self.stages
            .iter()
            .map(|stage| {
                let inputs: String = stage.inputs.iter().map(Pad::to_string).collect();
                let outputs: String = stage.outputs.iter().map(Pad::to_string).collect();
                format!("{inputs}{}{outputs}", stage.op.to_filter_chain())
            })
            .collect::<Vec<_>>()
            .join(";")
    }

    /// The output duration implied by the stage sequence.
    ///
    /// Walks the DAG propagating per-pad durations. Must agree with the
    /// duration oracle (before its display rounding) for every valid
    /// spec; the reverse stage's frame drop is ignored, matching the
    /// oracle's documented approximation.
    pub fn implied_duration_secs(&self) -> f64 {
        let mut durations: HashMap<&str, f64> = HashMap::new();

        for stage in &self.stages {
            let input_secs: Vec<f64> = stage
                .inputs
                .iter()
                .map(|pad| durations.get(pad.name()).copied().unwrap_or(0.0))
                .collect();

            let out_secs = match &stage.op {
                StageOp::Trim {
                    start_secs,
                    end_secs,
                    ..
                } => match end_secs {
                    Some(end) => (end - start_secs).max(0.0),
                    None => (input_secs.first().copied().unwrap_or(0.0) - start_secs).max(0.0),
                },
                StageOp::TimeRemap { expr } => {
                    expr.map_duration(input_secs.first().copied().unwrap_or(0.0))
                }
                StageOp::Split { .. } | StageOp::Reverse { .. } => {
                    input_secs.first().copied().unwrap_or(0.0)
                }
                StageOp::Concat { .. } => input_secs.iter().sum(),
                StageOp::Crop { .. } | StageOp::Scale { .. } => {
                    input_secs.first().copied().unwrap_or(0.0)
                }
            };

            for output in &stage.outputs {
                durations.insert(output.name(), out_secs);
            }
        }

        durations.get(self.sink.name()).copied().unwrap_or(0.0)
    }
}
