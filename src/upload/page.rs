//! HTML status page for the upload program.

use askama::Template;

use super::size::format_size;
use super::{UploadError, UploadReport};

/// Shown if the template itself fails to render.
const FALLBACK_PAGE: &str = "<!DOCTYPE html>\n<html lang=\"fr\"><head><meta charset=\"UTF-8\">\
<title>Erreur - Upload de fichier</title></head><body><h1>Erreur lors de l'upload</h1>\
<p>Une erreur est survenue.</p></body></html>\n";

/// One row of the stored-files list.
#[derive(Debug, Clone)]
pub struct FileRow {
    pub original_name: String,
    pub saved_as: String,
    pub size: String,
}

/// Upload status page.
#[derive(Template, Debug, Clone)]
#[template(path = "upload.html")]
pub struct UploadPage {
    pub success: bool,
    pub message: String,
    pub files: Vec<FileRow>,
    pub description: String,
}

impl UploadPage {
    /// Page listing the stored files and the description.
    pub fn success(report: &UploadReport) -> Self {
        Self {
            success: true,
            message: "Fichiers uploadés avec succès.".to_string(),
            files: report
                .files
                .iter()
                .map(|f| FileRow {
                    original_name: f.original_name.clone(),
                    saved_as: f.saved_as.clone(),
                    size: format_size(f.size_bytes),
                })
                .collect(),
            description: report.description.clone().unwrap_or_default(),
        }
    }

    /// Page describing why nothing was stored.
    pub fn failure(error: &UploadError) -> Self {
        Self {
            success: false,
            message: error.user_message(),
            files: Vec::new(),
            description: String::new(),
        }
    }

    /// Render to HTML, falling back to a static error page.
    pub fn render_html(&self) -> String {
        self.render().unwrap_or_else(|e| {
            tracing::error!("Failed to render upload page: {}", e);
            FALLBACK_PAGE.to_string()
        })
    }
}
