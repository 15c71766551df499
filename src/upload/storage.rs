//! Upload directory storage.
//!
//! Files are stored flat in the upload directory under a timestamped name:
//! ```text
//! {base_path}/
//! ├── 20240115_103005_report.pdf
//! ├── 20240115_103005_photo.jpg
//! └── 20240116_090000_report.pdf
//! ```
//! Two uploads of the same filename within one second map to the same name;
//! the later one overwrites the earlier.

use std::fmt::Display;
use std::fs;
use std::io;
use std::path::PathBuf;

use bytes::Bytes;
use chrono::{DateTime, TimeZone};
use futures::{Stream, StreamExt};
use tokio::io::AsyncWriteExt;

use super::{StoredFile, UploadError};
use crate::datetime::format_upload_timestamp;

/// Storage for uploaded files.
#[derive(Debug, Clone)]
pub struct UploadStorage {
    /// Upload directory.
    base_path: PathBuf,
}

impl UploadStorage {
    /// Open the upload directory, creating it and its parents if missing.
    ///
    /// # Errors
    ///
    /// [`UploadError::CreateDirectory`] when the directory cannot be created,
    /// e.g. because a regular file occupies part of the path.
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, UploadError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).map_err(|source| UploadError::CreateDirectory {
            path: base_path.clone(),
            source,
        })?;

        Ok(Self { base_path })
    }

    /// Get the full file path for a stored name.
    pub fn get_file_path(&self, saved_as: &str) -> PathBuf {
        self.base_path.join(saved_as)
    }

    /// Size of a stored file as reported by the filesystem.
    pub fn file_size(&self, saved_as: &str) -> io::Result<u64> {
        fs::metadata(self.get_file_path(saved_as)).map(|m| m.len())
    }

    /// Write one file part to storage.
    ///
    /// The stream is copied chunk by chunk to `<base_path>/<timestamp>_<name>`,
    /// truncating any existing file. If the stream or a write fails after the
    /// file was opened, the partial file is removed. If the file cannot be
    /// opened at all, whatever already sits at that path is left alone.
    ///
    /// # Arguments
    ///
    /// * `original_name` - The client-supplied filename, recorded verbatim
    /// * `stream` - The part's body chunks
    /// * `now` - Clock reading used for the timestamp prefix
    ///
    /// # Returns
    ///
    /// The record of the stored file, or `None` when `original_name` has no
    /// usable final component (nothing is written in that case).
    pub async fn save_stream<S, E, Tz>(
        &self,
        original_name: &str,
        stream: S,
        now: &DateTime<Tz>,
    ) -> Result<Option<StoredFile>, UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Display,
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let Some(saved_as) = stored_name(original_name, now) else {
            return Ok(None);
        };
        let path = self.get_file_path(&saved_as);
        let storage_err = |source: io::Error| UploadError::Storage {
            name: original_name.to_string(),
            source,
        };

        let file = tokio::fs::File::create(&path).await.map_err(storage_err)?;

        if let Err(e) = Self::copy_stream(file, original_name, stream).await {
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    tracing::warn!("Failed to remove partial upload {}: {}", path.display(), cleanup);
                }
            }
            return Err(e);
        }

        let size_bytes = self.file_size(&saved_as).map_err(storage_err)?;

        Ok(Some(StoredFile {
            original_name: original_name.to_string(),
            saved_as,
            size_bytes,
        }))
    }

    async fn copy_stream<S, E>(
        mut file: tokio::fs::File,
        name: &str,
        stream: S,
    ) -> Result<(), UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Display,
    {
        let storage_err = |source: io::Error| UploadError::Storage {
            name: name.to_string(),
            source,
        };
        let mut stream = std::pin::pin!(stream);

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| UploadError::Transfer {
                name: name.to_string(),
                message: e.to_string(),
            })?;
            file.write_all(&chunk).await.map_err(storage_err)?;
        }

        file.flush().await.map_err(storage_err)?;
        file.sync_all().await.map_err(storage_err)?;

        Ok(())
    }
}

/// Build the stored name for an uploaded file.
///
/// # Arguments
///
/// * `original_name` - The client-supplied filename, possibly with a path
/// * `now` - Clock reading for the prefix
///
/// # Returns
///
/// `<YYYYMMDD_HHMMSS>_<final component>`, or `None` if the final component
/// is empty, `.` or `..`.
pub fn stored_name<Tz>(original_name: &str, now: &DateTime<Tz>) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let base = base_name(original_name)?;
    Some(format!("{}_{}", format_upload_timestamp(now), base))
}

/// Final component of a client-supplied path, split on both separators.
fn base_name(filename: &str) -> Option<&str> {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match base {
        "" | "." | ".." => None,
        base => Some(base),
    }
}
