//! Upload request processing.
//!
//! [`UploadHandler::handle`] runs the checks and copies in order and returns
//! a plain result; [`UploadHandler::respond`] is the boundary that turns any
//! outcome into the HTML page.

use std::path::PathBuf;

use tokio::io::AsyncRead;
use tracing::{info, warn};

use super::page::UploadPage;
use super::storage::UploadStorage;
use super::{StoredFile, UploadError, UploadReport, DESCRIPTION_FIELD, FILE_FIELD};
use crate::cgi::{CgiRequest, CgiResponse};
use crate::config::UploadConfig;
use crate::datetime;

/// Result of processing one upload request.
pub type UploadOutcome = Result<UploadReport, UploadError>;

/// One upload request: method, content type and body reader.
#[derive(Debug)]
pub struct UploadRequest<R> {
    pub method: String,
    pub content_type: Option<String>,
    pub body: R,
}

impl<R> UploadRequest<R> {
    /// Create a new upload request.
    pub fn new(method: impl Into<String>, content_type: Option<String>, body: R) -> Self {
        Self {
            method: method.into(),
            content_type,
            body,
        }
    }

    /// Build from the CGI environment and a body reader.
    pub fn from_cgi(request: &CgiRequest, body: R) -> Self {
        Self::new(request.method.clone(), request.content_type.clone(), body)
    }
}

/// Handler for the upload program.
#[derive(Debug, Clone)]
pub struct UploadHandler {
    upload_dir: PathBuf,
}

impl UploadHandler {
    /// Create a handler writing into `upload_dir`.
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    /// Create a handler from configuration.
    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.directory_path())
    }

    /// Directory uploads are written to. It is created when a request is
    /// handled.
    pub fn upload_dir(&self) -> &std::path::Path {
        &self.upload_dir
    }

    /// Process one upload request.
    ///
    /// # Checks, in order
    /// 1. Upload directory exists or can be created
    /// 2. Method is POST
    /// 3. Body is multipart/form-data with an `uploaded_file` field
    ///
    /// Every `uploaded_file` part with a filename is written to disk. The
    /// first failure aborts the request.
    pub async fn handle<R>(&self, request: UploadRequest<R>) -> UploadOutcome
    where
        R: AsyncRead + Unpin + Send,
    {
        let storage = UploadStorage::open(&self.upload_dir)?;

        if !request.method.eq_ignore_ascii_case("POST") {
            return Err(UploadError::MethodNotAllowed(request.method));
        }

        let boundary = request
            .content_type
            .as_deref()
            .ok_or_else(|| UploadError::InvalidMultipart("missing content type".to_string()))
            .and_then(|ct| {
                multer::parse_boundary(ct).map_err(|e| UploadError::InvalidMultipart(e.to_string()))
            })?;

        let mut multipart = multer::Multipart::with_reader(request.body, boundary);

        let mut saw_file_field = false;
        let mut description: Option<String> = None;
        let mut files: Vec<StoredFile> = Vec::new();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            warn!("Failed to read multipart field: {}", e);
            UploadError::InvalidMultipart(e.to_string())
        })? {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                FILE_FIELD => {
                    saw_file_field = true;
                    let filename = field.file_name().unwrap_or("").to_string();
                    if filename.is_empty() {
                        continue;
                    }

                    let stored = storage
                        .save_stream(&filename, field, &datetime::now())
                        .await
                        .inspect_err(|e| warn!("Upload of {} failed: {}", filename, e))?;

                    if let Some(stored) = stored {
                        info!(
                            "Stored {} as {} ({} bytes)",
                            stored.original_name, stored.saved_as, stored.size_bytes
                        );
                        files.push(stored);
                    }
                }
                DESCRIPTION_FIELD if description.is_none() => {
                    description = Some(field.text().await.map_err(|e| {
                        warn!("Failed to read description: {}", e);
                        UploadError::InvalidMultipart(e.to_string())
                    })?);
                }
                _ => {}
            }
        }

        if !saw_file_field {
            return Err(UploadError::MissingFileField);
        }
        if files.is_empty() {
            return Err(UploadError::NoFilesStored);
        }

        Ok(UploadReport {
            files,
            description: description.filter(|d| !d.trim().is_empty()),
        })
    }

    /// Process one upload request and render the HTML response.
    ///
    /// Never fails: every error becomes the error page.
    pub async fn respond<R>(&self, request: UploadRequest<R>) -> CgiResponse
    where
        R: AsyncRead + Unpin + Send,
    {
        let page = match self.handle(request).await {
            Ok(report) => UploadPage::success(&report),
            Err(e) => {
                warn!("Upload rejected: {}", e);
                UploadPage::failure(&e)
            }
        };
        CgiResponse::html(page.render_html())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BOUNDARY: &str = "X-BOUNDARY";

    fn multipart_type() -> Option<String> {
        Some(format!("multipart/form-data; boundary={BOUNDARY}"))
    }

    fn file_part(filename: &str, content: &str) -> String {
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"uploaded_file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n"
        )
    }

    fn text_part(name: &str, value: &str) -> String {
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{name}\"\r\n\r\n\
             {value}\r\n"
        )
    }

    fn body(parts: &[String]) -> Vec<u8> {
        let mut body = parts.concat();
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body.into_bytes()
    }

    fn post(body: Vec<u8>) -> UploadRequest<std::io::Cursor<Vec<u8>>> {
        UploadRequest::new("POST", multipart_type(), std::io::Cursor::new(body))
    }

    fn dir_entries(dir: &std::path::Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let handler = UploadHandler::new(temp_dir.path());

        let report = handler
            .handle(post(body(&[file_part("example.txt", "hello")])))
            .await
            .unwrap();

        assert_eq!(report.files.len(), 1);
        let stored = &report.files[0];
        assert_eq!(stored.original_name, "example.txt");
        assert_eq!(stored.size_bytes, 5);
        assert!(stored.saved_as.ends_with("_example.txt"));
        assert_eq!(stored.saved_as.len(), "YYYYMMDD_HHMMSS_example.txt".len());
        assert!(report.description.is_none());
        assert_eq!(dir_entries(temp_dir.path()), vec![stored.saved_as.clone()]);
    }

    #[tokio::test]
    async fn test_method_is_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        let handler = UploadHandler::new(temp_dir.path());
        let request = UploadRequest::new(
            "post",
            multipart_type(),
            std::io::Cursor::new(body(&[file_part("a.txt", "a")])),
        );

        assert!(handler.handle(request).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let handler = UploadHandler::new(temp_dir.path());
        let request = UploadRequest::new(
            "GET",
            multipart_type(),
            std::io::Cursor::new(body(&[file_part("a.txt", "a")])),
        );

        let result = handler.handle(request).await;

        assert!(matches!(result, Err(UploadError::MethodNotAllowed(m)) if m == "GET"));
        assert!(dir_entries(temp_dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_description_only_is_missing_file_field() {
        let temp_dir = TempDir::new().unwrap();
        let handler = UploadHandler::new(temp_dir.path());

        let result = handler.handle(post(body(&[text_part("description", "hi")]))).await;

        assert!(matches!(result, Err(UploadError::MissingFileField)));
        assert!(dir_entries(temp_dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_empty_filename_is_no_files_stored() {
        let temp_dir = TempDir::new().unwrap();
        let handler = UploadHandler::new(temp_dir.path());

        let result = handler.handle(post(body(&[file_part("", "")]))).await;

        assert!(matches!(result, Err(UploadError::NoFilesStored)));
        assert!(dir_entries(temp_dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_non_multipart_body_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let handler = UploadHandler::new(temp_dir.path());
        let request = UploadRequest::new(
            "POST",
            Some("application/x-www-form-urlencoded".to_string()),
            std::io::Cursor::new(b"uploaded_file=x".to_vec()),
        );

        let result = handler.handle(request).await;

        assert!(matches!(result, Err(UploadError::InvalidMultipart(_))));
        assert!(dir_entries(temp_dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_missing_content_type_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let handler = UploadHandler::new(temp_dir.path());
        let request = UploadRequest::new("POST", None, std::io::Cursor::new(Vec::new()));

        let result = handler.handle(request).await;

        assert!(matches!(result, Err(UploadError::InvalidMultipart(_))));
    }

    #[tokio::test]
    async fn test_multiple_files_with_description() {
        let temp_dir = TempDir::new().unwrap();
        let handler = UploadHandler::new(temp_dir.path());

        let report = handler
            .handle(post(body(&[
                file_part("one.txt", "first"),
                text_part("description", "holiday pictures"),
                file_part("two.txt", "second file"),
            ])))
            .await
            .unwrap();

        assert_eq!(report.files.len(), 2);
        assert_eq!(report.files[0].original_name, "one.txt");
        assert_eq!(report.files[0].size_bytes, 5);
        assert_eq!(report.files[1].original_name, "two.txt");
        assert_eq!(report.files[1].size_bytes, 11);
        assert_eq!(report.description.as_deref(), Some("holiday pictures"));
        for stored in &report.files {
            assert!(temp_dir.path().join(&stored.saved_as).is_file());
        }
    }

    #[tokio::test]
    async fn test_blank_description_is_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let handler = UploadHandler::new(temp_dir.path());

        let report = handler
            .handle(post(body(&[
                file_part("a.txt", "a"),
                text_part("description", "   "),
            ])))
            .await
            .unwrap();

        assert!(report.description.is_none());
    }

    #[tokio::test]
    async fn test_creates_missing_upload_directory() {
        let temp_dir = TempDir::new().unwrap();
        let upload_dir = temp_dir.path().join("www").join("uploads");
        let handler = UploadHandler::new(&upload_dir);

        let report = handler
            .handle(post(body(&[file_part("a.txt", "abc")])))
            .await
            .unwrap();

        assert!(upload_dir.is_dir());
        assert!(upload_dir.join(&report.files[0].saved_as).is_file());
    }

    #[tokio::test]
    async fn test_directory_creation_failure() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let handler = UploadHandler::new(blocker.join("uploads"));

        let result = handler.handle(post(body(&[file_part("a.txt", "a")]))).await;

        assert!(matches!(result, Err(UploadError::CreateDirectory { .. })));
    }

    #[tokio::test]
    async fn test_truncated_body_fails_without_record() {
        let temp_dir = TempDir::new().unwrap();
        let handler = UploadHandler::new(temp_dir.path());
        let truncated = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"uploaded_file\"; filename=\"cut.txt\"\r\n\r\n\
             this body never reaches its closing boundary"
        );

        let result = handler.handle(post(truncated.into_bytes())).await;

        assert!(result.is_err());
        assert!(dir_entries(temp_dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_respond_renders_success_page() {
        let temp_dir = TempDir::new().unwrap();
        let handler = UploadHandler::new(temp_dir.path());

        let response = handler
            .respond(post(body(&[file_part("example.txt", "hello")])))
            .await;

        assert_eq!(response.content_type(), "text/html; charset=utf-8");
        let html = response.body_text();
        assert!(html.contains("Upload réussi"));
        assert!(html.contains("example.txt"));
        assert!(html.contains("5 octets"));
    }

    #[tokio::test]
    async fn test_respond_renders_error_page() {
        let temp_dir = TempDir::new().unwrap();
        let handler = UploadHandler::new(temp_dir.path());
        let request = UploadRequest::new("GET", None, std::io::Cursor::new(Vec::new()));

        let response = handler.respond(request).await;

        let html = response.body_text();
        assert!(html.contains("Seule la méthode POST est autorisée pour ce script."));
        assert!(html.contains("message error"));
    }
}
