//! Error types for the CGI programs.

use thiserror::Error;

/// Common error type for the CGI programs.
///
/// Upload failures have their own taxonomy in [`crate::upload::UploadError`];
/// this type covers the plumbing shared by every program.
#[derive(Error, Debug)]
pub enum CgiError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTML template rendering error.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

/// Result type alias for CGI operations.
pub type Result<T> = std::result::Result<T, CgiError>;
