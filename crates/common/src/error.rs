//! Error types shared across Clipstick crates.

use std::path::PathBuf;

/// Top-level error type for Clipstick operations.
#[derive(Debug, thiserror::Error)]
pub enum ClipstickError {
    /// An `EditSpec` field violates its declared bounds. This is a caller
    /// bug: specs must be validated before reaching the compiler or oracle.
    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    /// The edit would produce a clip longer than the output policy allows.
    /// Expected and user-recoverable: export is simply refused.
    #[error("Output duration {output_secs:.2}s exceeds limit of {max_secs:.2}s")]
    DurationExceeded { output_secs: f64, max_secs: f64 },

    /// The transform engine (ffmpeg) rejected the compiled graph. Carries
    /// both the engine diagnostic and the filtergraph that was attempted.
    #[error("Transform engine failed: {diagnostic}")]
    EngineFailure {
        diagnostic: String,
        filtergraph: String,
    },

    /// The metadata probe could not read the source file.
    #[error("Failed to probe {path}: {message}")]
    ProbeFailure { path: PathBuf, message: String },

    /// A second export was requested while one is still in flight.
    #[error("An export is already in progress")]
    ExportBusy,

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ClipstickError.
pub type ClipstickResult<T> = Result<T, ClipstickError>;

impl ClipstickError {
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn probe(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::ProbeFailure {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}
