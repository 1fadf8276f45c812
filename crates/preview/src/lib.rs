//! Clipstick Preview
//!
//! Approximates the compiled output on a plain media surface, live,
//! without rendering anything: per-tick playback-rate control for the
//! speed segment, loop-back at the selection end, and a manually
//! stepped reverse pass for boomerang.
//!
//! The scheduler is surface-agnostic. Anything that can report and set
//! a playback position implements [`PlaybackSurface`]; a deterministic
//! [`SimulatedSurface`] backs the tests and the headless preview
//! command.

pub mod scheduler;
pub mod surface;

pub use scheduler::{PlaybackPhase, PreviewScheduler, MIN_PREVIEW_RATE, START_TOLERANCE_SECS};
pub use surface::{PlaybackSurface, SimulatedSurface};
