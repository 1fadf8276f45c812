//! CLI subcommands and shared edit-flag parsing.

pub mod check;
pub mod duration;
pub mod export;
pub mod graph;
pub mod preview;
pub mod probe;

use clap::Args;
use clipstick_common::config::PolicyDefaults;
use clipstick_edit_model::{EditSpec, MediaInfo, OutputConstraints, SpeedRange, SpeedSegment};

/// Edit flags shared by every command that consumes an edit.
#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    /// Selection start in source seconds
    #[arg(long)]
    pub trim_start: Option<f64>,

    /// Selection end in source seconds
    #[arg(long)]
    pub trim_end: Option<f64>,

    /// Speed factor (>1 faster, <1 slower)
    #[arg(long)]
    pub speed: Option<f64>,

    /// Ramp the rate from 1.0 up to the speed factor across the range
    #[arg(long)]
    pub speed_fade: bool,

    /// Speed range start, seconds from the selection start
    #[arg(long)]
    pub speed_from: Option<f64>,

    /// Speed range end, seconds from the selection start
    #[arg(long)]
    pub speed_to: Option<f64>,

    /// Mirror playback into a back-and-forth loop
    #[arg(long)]
    pub boomerang: bool,

    /// Frames dropped at the boomerang apex
    #[arg(long, default_value = "1")]
    pub frame_trim: u32,

    /// Crop rectangle as WxH+X+Y (defaults to the centered square)
    #[arg(long)]
    pub crop: Option<String>,
}

impl EditArgs {
    /// Build a validated edit spec for the probed media.
    pub fn to_spec(&self, info: &MediaInfo) -> anyhow::Result<EditSpec> {
        let mut spec = info.seed_spec(policy_constraints(&PolicyDefaults::default()));

        if let Some(start) = self.trim_start {
            spec.trim.start_secs = start;
        }
        if let Some(end) = self.trim_end {
            spec.trim.end_secs = end;
        }

        if let Some(value) = self.speed {
            let trimmed = spec.trim.duration_secs();
            spec.speed = SpeedSegment {
                enabled: true,
                value,
                fade: self.speed_fade,
                range: SpeedRange {
                    start_secs: self.speed_from.unwrap_or(0.0),
                    end_secs: self.speed_to.unwrap_or(trimmed),
                },
            };
        }

        spec.boomerang.enabled = self.boomerang;
        spec.boomerang.frame_trim = self.frame_trim;

        if let Some(crop) = &self.crop {
            spec.crop = parse_crop(crop)?;
        }

        spec.validate()
            .map_err(|e| anyhow::anyhow!("Invalid edit: {e}"))?;
        Ok(spec)
    }
}

/// Translate configured policy defaults into the spec's output policy.
pub fn policy_constraints(policy: &PolicyDefaults) -> OutputConstraints {
    OutputConstraints {
        target_fps: policy.target_fps,
        max_edge_pixels: policy.max_edge_pixels,
        max_bytes: policy.max_bytes,
        max_duration_secs: policy.max_duration_secs,
    }
}

/// Parse a crop rectangle in `WxH+X+Y` form, e.g. `720x720+600+0`.
fn parse_crop(s: &str) -> anyhow::Result<clipstick_edit_model::CropRect> {
    let err = || anyhow::anyhow!("Invalid crop '{s}': expected WxH+X+Y, e.g. 720x720+600+0");

    let (size, offset) = s.split_once('+').ok_or_else(err)?;
    let (w, h) = size.split_once('x').ok_or_else(err)?;
    let (x, y) = offset.split_once('+').ok_or_else(err)?;

    Ok(clipstick_edit_model::CropRect {
        width: w.parse().map_err(|_| err())?,
        height: h.parse().map_err(|_| err())?,
        x: x.parse().map_err(|_| err())?,
        y: y.parse().map_err(|_| err())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> EditArgs {
        EditArgs {
            trim_start: None,
            trim_end: None,
            speed: None,
            speed_fade: false,
            speed_from: None,
            speed_to: None,
            boomerang: false,
            frame_trim: 1,
            crop: None,
        }
    }

    fn info() -> MediaInfo {
        MediaInfo::new("clip.mp4", 8.0, 1920, 1080)
    }

    #[test]
    fn test_default_args_seed_a_valid_spec() {
        let spec = args().to_spec(&info()).unwrap();
        assert!((spec.trim.start_secs - 0.0).abs() < 1e-9);
        assert!((spec.trim.end_secs - 3.0).abs() < 1e-9);
        assert!(!spec.speed.enabled);
        assert!(!spec.boomerang.enabled);
    }

    #[test]
    fn test_speed_range_defaults_to_full_selection() {
        let mut a = args();
        a.trim_end = Some(2.0);
        a.speed = Some(2.0);
        let spec = a.to_spec(&info()).unwrap();
        assert!(spec.speed.enabled);
        assert!((spec.speed.range.end_secs - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_trim_is_rejected() {
        let mut a = args();
        a.trim_start = Some(2.0);
        a.trim_end = Some(1.0);
        assert!(a.to_spec(&info()).is_err());
    }

    #[test]
    fn test_parse_crop() {
        let crop = parse_crop("720x720+600+0").unwrap();
        assert_eq!(crop.width, 720);
        assert_eq!(crop.height, 720);
        assert_eq!(crop.x, 600);
        assert_eq!(crop.y, 0);

        assert!(parse_crop("720x720").is_err());
        assert!(parse_crop("bogus").is_err());
    }
}
