//! Logging configuration and initialization.
//!
//! Standard output carries the CGI response, so log output goes to standard
//! error (which the host server forwards to its own log) and optionally to a
//! file.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Map a configured level name onto a tracing level. Unknown names log at
/// `info`.
fn parse_level(level: &str) -> Level {
    level
        .trim()
        .to_ascii_lowercase()
        .replace("warning", "warn")
        .parse()
        .unwrap_or(Level::INFO)
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::from_default_env().add_directive(parse_level(level).into())
}

/// Open the log file for appending, creating missing parent directories.
///
/// Every request is a fresh process, so the file is never truncated.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Initialize the logging system with the given configuration.
///
/// Logs go to stderr, and additionally to `config.file` when it is set.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if config.file.is_empty() {
        init_stderr_only(&config.level);
        return Ok(());
    }

    let log_file = Arc::new(open_log_file(Path::new(&config.file))?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr.and(log_file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(env_filter(&config.level))
        .init();

    Ok(())
}

/// Initialize stderr-only logging.
pub fn init_stderr_only(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true),
        )
        .with(env_filter(level))
        .init();
}
