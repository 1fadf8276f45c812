//! Clipstick Timeline Core
//!
//! Pure math shared by every consumer of an [`EditSpec`]:
//! - **Time Remap:** maps positions on the trimmed timeline to output
//!   time under constant or linearly ramped speed
//! - **Duration Oracle:** closed-form output duration and validity
//!
//! This crate is pure computation: no I/O, no platform dependencies.
//! All inputs are data; all outputs are data. The graph compiler and
//! the preview scheduler must agree with these formulas exactly.
//!
//! [`EditSpec`]: clipstick_edit_model::EditSpec

pub mod duration;
pub mod remap;

pub use duration::{check_duration, compute_output_duration, DurationReport};
pub use remap::TimeRemap;
