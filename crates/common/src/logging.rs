//! Logging and tracing initialization.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber with the given configuration.
///
/// When `config.file` is set, log output is appended to that path
/// instead of stderr; if the file cannot be opened the subscriber
/// falls back to stderr and reports the failure there.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let log_file = config.file.as_ref().and_then(|path| match open_log_file(path) {
        Ok(file) => Some(file),
        Err(err) => {
            eprintln!("Failed to open log file {}: {err}", path.display());
            None
        }
    });

    if let Some(file) = log_file {
        let writer = Mutex::new(file);
        if config.json {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .json()
                .with_writer(writer)
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        } else {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer)
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
    } else if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}

/// Initialize logging with defaults (useful for tests and quick scripts).
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}

/// Open the log file for appending, creating parent directories.
fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("clipstick-log-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_open_log_file_creates_parent_dirs() {
        let dir = temp_path("nested");
        let path = dir.join("logs").join("clipstick.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_open_log_file_appends_across_sessions() {
        use std::io::Write;

        let path = temp_path("append.log");
        std::fs::remove_file(&path).ok();

        writeln!(open_log_file(&path).unwrap(), "first session").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second session").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("first session"));
        assert!(content.contains("second session"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_init_logging_with_unopenable_file_falls_back() {
        // A path below a device node can never be created.
        init_logging(&LoggingConfig {
            level: "info".to_string(),
            json: false,
            file: Some(PathBuf::from("/dev/null/clipstick.log")),
        });
    }
}
