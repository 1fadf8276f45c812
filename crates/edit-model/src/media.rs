//! Probed metadata of the uploaded source file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::spec::{EditSpec, OutputConstraints};

/// Metadata of a source media file, as reported by the probe.
///
/// Consumed once per uploaded file to seed the spec's source duration
/// and initial trim bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Path to the source file.
    pub path: PathBuf,

    /// Container duration in seconds.
    pub duration_secs: f64,

    /// Frame width in pixels.
    pub width: u32,

    /// Frame height in pixels.
    pub height: u32,

    /// Wall-clock time the probe ran (ISO 8601).
    pub probed_at: String,
}

impl MediaInfo {
    pub fn new(path: impl Into<PathBuf>, duration_secs: f64, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            duration_secs,
            width,
            height,
            probed_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Seed a fresh edit spec from this media under the given policy.
    pub fn seed_spec(&self, constraints: OutputConstraints) -> EditSpec {
        let mut spec = EditSpec::for_source(self.duration_secs, constraints);
        // Initial crop covers the largest centered square that fits.
        let edge = self.width.min(self.height);
        if edge > 0 {
            spec.crop.width = edge;
            spec.crop.height = edge;
            spec.crop.x = (self.width - edge) / 2;
            spec.crop.y = (self.height - edge) / 2;
        }
        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_spec_centers_square_crop() {
        let info = MediaInfo::new("clip.mp4", 8.0, 1920, 1080);
        let spec = info.seed_spec(OutputConstraints::default());

        assert_eq!(spec.crop.width, 1080);
        assert_eq!(spec.crop.height, 1080);
        assert_eq!(spec.crop.x, 420);
        assert_eq!(spec.crop.y, 0);
        assert!((spec.trim.end_secs - 3.0).abs() < 1e-9);
        assert_eq!(spec.validate(), Ok(()));
    }

    #[test]
    fn test_seed_spec_portrait_source() {
        let info = MediaInfo::new("clip.mp4", 2.0, 720, 1280);
        let spec = info.seed_spec(OutputConstraints::default());

        assert_eq!(spec.crop.width, 720);
        assert_eq!(spec.crop.x, 0);
        assert_eq!(spec.crop.y, 280);
    }
}
