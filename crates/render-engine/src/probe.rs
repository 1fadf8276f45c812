//! Source metadata probe (ffprobe).
//!
//! Read-only, consumed once per uploaded file to seed the spec's
//! source duration and initial trim/crop bounds. A probe failure aborts
//! the import with no partial state retained.

use std::path::Path;
use std::process::Command;

use clipstick_common::{ClipstickError, ClipstickResult};
use clipstick_edit_model::MediaInfo;

/// Probe duration and frame geometry of a media file.
pub fn probe_media(path: &Path) -> ClipstickResult<MediaInfo> {
    if !path.exists() {
        return Err(ClipstickError::probe(path, "file does not exist"));
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height:format=duration",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| ClipstickError::probe(path, format!("failed to run ffprobe: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ClipstickError::probe(
            path,
            format!("ffprobe exited with {}: {}", output.status, stderr.trim()),
        ));
    }

    parse_probe_output(path, &output.stdout)
}

fn parse_probe_output(path: &Path, stdout: &[u8]) -> ClipstickResult<MediaInfo> {
    let value: serde_json::Value = serde_json::from_slice(stdout)
        .map_err(|e| ClipstickError::probe(path, format!("unparseable ffprobe output: {e}")))?;

    let duration_secs = value
        .pointer("/format/duration")
        .and_then(|d| d.as_str())
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| ClipstickError::probe(path, "missing container duration"))?;

    let stream = value
        .pointer("/streams/0")
        .ok_or_else(|| ClipstickError::probe(path, "no video stream found"))?;

    let width = stream.get("width").and_then(|w| w.as_u64()).unwrap_or(0) as u32;
    let height = stream.get("height").and_then(|h| h.as_u64()).unwrap_or(0) as u32;

    if width == 0 || height == 0 {
        return Err(ClipstickError::probe(
            path,
            format!("invalid frame geometry {width}x{height}"),
        ));
    }

    tracing::debug!(
        path = %path.display(),
        duration_secs,
        width,
        height,
        "Probed source media"
    );

    Ok(MediaInfo::new(path, duration_secs, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_well_formed_probe_output() {
        let json = br#"{
            "streams": [{"width": 1920, "height": 1080}],
            "format": {"duration": "12.480000"}
        }"#;
        let info = parse_probe_output(&PathBuf::from("clip.mp4"), json).unwrap();
        assert!((info.duration_secs - 12.48).abs() < 1e-9);
        assert_eq!(info.width, 1920);
        assert_eq!(info.height, 1080);
    }

    #[test]
    fn test_missing_duration_is_a_probe_failure() {
        let json = br#"{"streams": [{"width": 640, "height": 480}], "format": {}}"#;
        let err = parse_probe_output(&PathBuf::from("clip.mp4"), json).unwrap_err();
        assert!(matches!(err, ClipstickError::ProbeFailure { .. }));
    }

    #[test]
    fn test_missing_video_stream_is_a_probe_failure() {
        let json = br#"{"streams": [], "format": {"duration": "3.0"}}"#;
        let err = parse_probe_output(&PathBuf::from("audio.ogg"), json).unwrap_err();
        assert!(matches!(err, ClipstickError::ProbeFailure { .. }));
    }

    #[test]
    fn test_nonexistent_file_fails_before_spawning() {
        let err = probe_media(&PathBuf::from("/definitely/not/here.mp4")).unwrap_err();
        assert!(matches!(err, ClipstickError::ProbeFailure { .. }));
    }
}
