//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where exported stickers are written.
    pub output_dir: PathBuf,

    /// Default output policy values.
    pub policy: PolicyDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default output policy parameters. These mirror the Telegram video
/// sticker requirements and are not editable from the UI, only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDefaults {
    /// Target output frame rate.
    pub target_fps: u32,

    /// Maximum edge length of the output frame in pixels.
    pub max_edge_pixels: u32,

    /// Maximum output file size in bytes.
    pub max_bytes: u64,

    /// Maximum output duration in seconds.
    pub max_duration_secs: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "clipstick=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            policy: PolicyDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for PolicyDefaults {
    fn default() -> Self {
        Self {
            target_fps: 30,
            max_edge_pixels: 512,
            max_bytes: 256 * 1024,
            max_duration_secs: 3.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("clipstick").join("config.json")
}

/// Default sticker output directory.
fn default_output_dir() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("clipstick").join("stickers")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_matches_sticker_requirements() {
        let policy = PolicyDefaults::default();
        assert_eq!(policy.target_fps, 30);
        assert_eq!(policy.max_edge_pixels, 512);
        assert_eq!(policy.max_bytes, 262_144);
        assert!((policy.max_duration_secs - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.policy.max_edge_pixels, config.policy.max_edge_pixels);
    }
}
