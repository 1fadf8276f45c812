//! Clipstick Render Engine
//!
//! Offline export pipeline that turns an [`EditSpec`] into a finished
//! sticker file via the external transform engine (ffmpeg).
//!
//! # Pipeline Architecture
//!
//! ```text
//! source.mp4 ──┐
//!              ├── Trim (fps forced, PTS reset)
//! EditSpec ────┘      │
//!                     ├── Speed (split / remap / concat)
//!                     │
//!                     ├── Boomerang (split / reverse / concat)
//!                     │
//!                     ├── Crop
//!                     │
//!                     ├── Scale (fit, never upscale)
//!                     ▼
//!              Encode (VP9, silent, bitrate-bounded)
//!                     │
//!                     ▼
//!                sticker.webm
//! ```
//!
//! The compiler builds a typed [`TransformGraph`] without touching media
//! bytes; the graph is serialized to ffmpeg `filter_complex` syntax only
//! at the engine boundary.
//!
//! [`EditSpec`]: clipstick_edit_model::EditSpec
//! [`TransformGraph`]: graph::TransformGraph

pub mod compile;
pub mod encode;
pub mod export;
pub mod graph;
pub mod probe;

pub use compile::compile;
pub use encode::EncoderConstraints;
pub use export::*;
pub use graph::{Pad, RemapExpr, Stage, StageOp, TransformGraph};
pub use probe::probe_media;
