//! Clipstick Edit Model
//!
//! Defines the core data contracts for a sticker editing session:
//! - **EditSpec:** The immutable snapshot of all user edit decisions
//!   (trim, speed remapping, boomerang, crop) plus the output policy
//! - **MediaInfo:** Probed metadata of the uploaded source file
//!
//! The spec is a plain value. UI mutations produce a fresh snapshot;
//! the duration oracle, the graph compiler, and the preview scheduler
//! each consume it independently and never share derived state.

pub mod media;
pub mod spec;

pub use media::*;
pub use spec::*;
