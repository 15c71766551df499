//! Configuration module for the CGI programs.
//!
//! Every program reads the same optional TOML file. A missing file is not an
//! error: CGI programs must still answer the request, so defaults apply.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{CgiError, Result};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "WEBSERV_CGI_CONFIG";

/// Configuration file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "cgi.toml";

/// Upload configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Directory receiving uploaded files, relative to the working directory
    /// the host server runs the program in.
    #[serde(default = "default_upload_directory")]
    pub directory: String,
}

fn default_upload_directory() -> String {
    "../uploads".to_string()
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            directory: default_upload_directory(),
        }
    }
}

impl UploadConfig {
    /// Upload directory as a path.
    pub fn directory_path(&self) -> PathBuf {
        PathBuf::from(&self.directory)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to an optional log file. Empty disables file logging.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Upload configuration.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(CgiError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration, falling back to defaults when the file is missing.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::load(path) {
            Err(CgiError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            other => other,
        }
    }

    /// Load configuration from the path in [`CONFIG_PATH_ENV`] (or
    /// [`DEFAULT_CONFIG_PATH`]) and apply environment variable overrides.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let mut config = Self::load_or_default(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CgiError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `WEBSERV_CGI_UPLOAD_DIR`: Override the upload directory
    /// - `WEBSERV_CGI_LOG_LEVEL`: Override the log level
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("WEBSERV_CGI_UPLOAD_DIR").filter(|v| !v.is_empty()) {
            self.upload.directory = dir;
        }
        if let Some(level) = lookup("WEBSERV_CGI_LOG_LEVEL").filter(|v| !v.is_empty()) {
            self.logging.level = level;
        }
    }
}
