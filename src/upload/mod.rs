//! File upload handling.
//!
//! This module implements the upload program:
//! - Upload directory preparation and timestamped file naming
//! - Streaming multipart file parts to disk
//! - Rendering the HTML status page

mod handler;
mod page;
mod size;
mod storage;

pub use handler::{UploadHandler, UploadOutcome, UploadRequest};
pub use page::{FileRow, UploadPage};
pub use size::format_size;
pub use storage::{stored_name, UploadStorage};

use std::path::PathBuf;

use thiserror::Error;

/// Form field carrying the uploaded file(s). May repeat.
pub const FILE_FIELD: &str = "uploaded_file";

/// Optional free-text form field echoed back on success.
pub const DESCRIPTION_FIELD: &str = "description";

/// One file written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Filename as sent by the client.
    pub original_name: String,
    /// Name of the file inside the upload directory.
    pub saved_as: String,
    /// Size on disk after the write completed.
    pub size_bytes: u64,
}

/// Successful upload: at least one stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    /// Stored files, in request order.
    pub files: Vec<StoredFile>,
    /// Non-empty description, if one was submitted.
    pub description: Option<String>,
}

/// Reasons an upload produced no result.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The upload directory was missing and could not be created.
    #[error("failed to create upload directory {}: {source}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Request method other than POST.
    #[error("method {0:?} not allowed")]
    MethodNotAllowed(String),

    /// Body is not readable multipart/form-data.
    #[error("invalid multipart body: {0}")]
    InvalidMultipart(String),

    /// No `uploaded_file` field in the form.
    #[error("no uploaded_file field in form")]
    MissingFileField,

    /// File fields were present but none carried a filename.
    #[error("no file was stored")]
    NoFilesStored,

    /// Reading a file part from the request failed.
    #[error("failed to read {name}: {message}")]
    Transfer { name: String, message: String },

    /// Writing a file part to disk failed.
    #[error("failed to store {name}: {source}")]
    Storage {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl UploadError {
    /// Message shown on the HTML page.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::CreateDirectory { source, .. } => {
                format!("Erreur lors de la création du répertoire d'upload: {source}")
            }
            UploadError::MethodNotAllowed(_) => {
                "Seule la méthode POST est autorisée pour ce script.".to_string()
            }
            UploadError::MissingFileField => "Aucun fichier n'a été soumis.".to_string(),
            UploadError::NoFilesStored => "Aucun fichier n'a été uploadé.".to_string(),
            UploadError::InvalidMultipart(message) => {
                format!("Une erreur est survenue: {message}")
            }
            UploadError::Transfer { message, .. } => {
                format!("Une erreur est survenue: {message}")
            }
            UploadError::Storage { source, .. } => {
                format!("Une erreur est survenue: {source}")
            }
        }
    }
}
